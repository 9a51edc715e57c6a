use super::surface::{ChoiceRequest, OptionSource, PromptSurface, TextRequest};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Pre-recorded answer consumed by the next prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    /// Pick the item with this label
    Choose(String),
    ChooseIndex(usize),
    Text(String),
    Folder(PathBuf),
    Confirm(bool),
    /// Dismiss the prompt
    Dismiss,
}

impl ScriptedAnswer {
    pub fn choose(label: impl Into<String>) -> Self {
        ScriptedAnswer::Choose(label.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        ScriptedAnswer::Text(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Choice,
    Text,
    Folder,
    Confirm,
}

/// What the user was shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub kind: PromptKind,
    pub title: String,
    pub options: Vec<String>,
    pub validation_message: Option<String>,
}

/// Prompt surface that replays a queue of answers and records every prompt
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<ScriptedAnswer>>,
    shown: Mutex<Vec<PromptRecord>>,
    errors: Mutex<Vec<String>>,
    opened: Mutex<Vec<PathBuf>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        let prompt = Self::new();
        prompt.add_answers(answers);
        prompt
    }

    pub fn add_answers(&self, answers: impl IntoIterator<Item = ScriptedAnswer>) {
        lock(&self.answers).extend(answers);
    }

    pub fn remaining_answers(&self) -> usize {
        lock(&self.answers).len()
    }

    pub fn shown(&self) -> Vec<PromptRecord> {
        lock(&self.shown).clone()
    }

    pub fn shown_titles(&self) -> Vec<String> {
        self.shown().into_iter().map(|r| r.title).collect()
    }

    pub fn prompt_count(&self) -> usize {
        lock(&self.shown).len()
    }

    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }

    pub fn opened_files(&self) -> Vec<PathBuf> {
        lock(&self.opened).clone()
    }

    fn record(&self, record: PromptRecord) {
        lock(&self.shown).push(record);
    }

    fn next_answer(&self, title: &str) -> Result<ScriptedAnswer> {
        lock(&self.answers)
            .pop_front()
            .ok_or_else(|| anyhow!("ScriptedPrompt: no answer scripted for '{}'", title))
    }
}

#[async_trait]
impl PromptSurface for ScriptedPrompt {
    async fn choose_one(
        &self,
        request: &ChoiceRequest,
        options: OptionSource<'_>,
    ) -> Result<Option<usize>> {
        let items = options.await?;
        let labels: Vec<String> = items.iter().map(|i| i.label.clone()).collect();
        self.record(PromptRecord {
            kind: PromptKind::Choice,
            title: request.title.clone(),
            options: labels.clone(),
            validation_message: None,
        });

        match self.next_answer(&request.title)? {
            ScriptedAnswer::Choose(label) => labels
                .iter()
                .position(|l| *l == label)
                .map(Some)
                .ok_or_else(|| anyhow!("'{}' is not among {:?}", label, labels)),
            ScriptedAnswer::ChooseIndex(index) if index < labels.len() => Ok(Some(index)),
            ScriptedAnswer::Dismiss => Ok(None),
            other => bail!("Unexpected answer {:?} for '{}'", other, request.title),
        }
    }

    async fn text_input(&self, request: &TextRequest) -> Result<Option<String>> {
        self.record(PromptRecord {
            kind: PromptKind::Text,
            title: request.title.clone(),
            options: Vec::new(),
            validation_message: request.validation_message.clone(),
        });

        match self.next_answer(&request.title)? {
            ScriptedAnswer::Text(value) => Ok(Some(value)),
            ScriptedAnswer::Dismiss => Ok(None),
            other => bail!("Unexpected answer {:?} for '{}'", other, request.title),
        }
    }

    async fn browse_folder(&self, title: &str) -> Result<Option<PathBuf>> {
        self.record(PromptRecord {
            kind: PromptKind::Folder,
            title: title.to_string(),
            options: Vec::new(),
            validation_message: None,
        });

        match self.next_answer(title)? {
            ScriptedAnswer::Folder(path) => Ok(Some(path)),
            ScriptedAnswer::Dismiss => Ok(None),
            other => bail!("Unexpected answer {:?} for '{}'", other, title),
        }
    }

    async fn confirm(&self, message: &str, affirmative: &str, negative: &str) -> Result<bool> {
        self.record(PromptRecord {
            kind: PromptKind::Confirm,
            title: message.to_string(),
            options: vec![affirmative.to_string(), negative.to_string()],
            validation_message: None,
        });

        match self.next_answer(message)? {
            ScriptedAnswer::Confirm(answer) => Ok(answer),
            ScriptedAnswer::Dismiss => Ok(false),
            other => bail!("Unexpected answer {:?} for '{}'", other, message),
        }
    }

    async fn open_file(&self, path: &Path) -> Result<()> {
        lock(&self.opened).push(path.to_path_buf());
        Ok(())
    }

    async fn notify_error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ChoiceItem;
    use futures_util::FutureExt;

    fn items(labels: &[&str]) -> Vec<ChoiceItem> {
        labels.iter().map(|l| ChoiceItem::new(*l)).collect()
    }

    #[tokio::test]
    async fn test_choose_by_label() {
        let prompt = ScriptedPrompt::with_answers([ScriptedAnswer::choose("b")]);
        let request = ChoiceRequest::new("Pick", "");
        let options = items(&["a", "b"]);

        let index = prompt
            .choose_one(&request, async move { Ok(options) }.boxed())
            .await
            .unwrap();

        assert_eq!(index, Some(1));
        assert_eq!(prompt.shown()[0].options, vec!["a", "b"]);
        assert_eq!(prompt.remaining_answers(), 0);
    }

    #[tokio::test]
    async fn test_dismiss_and_confirm() {
        let prompt =
            ScriptedPrompt::with_answers([ScriptedAnswer::Dismiss, ScriptedAnswer::Confirm(true)]);

        let text = prompt.text_input(&TextRequest::default()).await.unwrap();
        assert!(text.is_none());
        assert!(prompt.confirm("Commit?", "Yes", "No").await.unwrap());
        assert_eq!(prompt.prompt_count(), 2);
    }

    #[tokio::test]
    async fn test_option_errors_propagate_before_answer() {
        let prompt = ScriptedPrompt::with_answers([ScriptedAnswer::choose("a")]);
        let request = ChoiceRequest::new("Pick", "");

        let result = prompt
            .choose_one(&request, async { Err(anyhow!("listing failed")) }.boxed())
            .await;

        assert!(result.is_err());
        assert_eq!(prompt.remaining_answers(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_script_is_an_error() {
        let prompt = ScriptedPrompt::new();
        assert!(prompt.browse_folder("Select folder").await.is_err());
    }
}
