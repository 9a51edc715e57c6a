use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};

/// One entry of a single-choice prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceItem {
    pub label: String,
    pub description: Option<String>,
}

impl ChoiceItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRequest {
    pub title: String,
    pub placeholder: String,
}

impl ChoiceRequest {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            placeholder: placeholder.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRequest {
    pub title: String,
    pub placeholder: String,
    pub initial_value: Option<String>,
    /// Set when re-asking after the previous answer was rejected
    pub validation_message: Option<String>,
}

/// Option list that may still be loading when the prompt is shown
pub type OptionSource<'a> = BoxFuture<'a, Result<Vec<ChoiceItem>>>;

/// Interactive surface the wizard asks questions through.
///
/// `Ok(None)` from any asking method means the user dismissed the prompt.
#[async_trait]
pub trait PromptSurface: Send + Sync {
    /// Shows the prompt right away; selection completes only after `options` resolves.
    /// Returns the index of the chosen item.
    async fn choose_one(
        &self,
        request: &ChoiceRequest,
        options: OptionSource<'_>,
    ) -> Result<Option<usize>>;

    async fn text_input(&self, request: &TextRequest) -> Result<Option<String>>;

    async fn browse_folder(&self, title: &str) -> Result<Option<PathBuf>>;

    /// `false` for the negative answer and for dismissal
    async fn confirm(&self, message: &str, affirmative: &str, negative: &str) -> Result<bool>;

    async fn open_file(&self, path: &Path) -> Result<()>;

    async fn notify_error(&self, message: &str);
}
