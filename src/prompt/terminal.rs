//! Terminal prompts built on dialoguer

use super::surface::{ChoiceItem, ChoiceRequest, OptionSource, PromptSurface, TextRequest};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub struct TerminalPrompt {
    spinner: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            spinner: atty::is(atty::Stream::Stderr),
        }
    }

    pub fn without_spinner() -> Self {
        Self { spinner: false }
    }

    fn busy(&self, message: &str) -> Option<ProgressBar> {
        if !self.spinner {
            return None;
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(format!("{} (loading...)", message));
        bar.enable_steady_tick(Duration::from_millis(100));
        Some(bar)
    }

    async fn select(title: String, labels: Vec<String>) -> Result<Option<usize>> {
        tokio::task::spawn_blocking(move || {
            Select::new()
                .with_prompt(title)
                .items(&labels)
                .default(0)
                .interact_opt()
        })
        .await
        .context("Prompt task panicked")?
        .context("Failed to read selection")
    }

    /// Trimmed answer; empty when the user just pressed Enter
    async fn read_line(title: String, initial: Option<String>) -> Result<String> {
        let answer = tokio::task::spawn_blocking(move || {
            let mut input = Input::<String>::new().with_prompt(title).allow_empty(true);
            if let Some(initial) = initial {
                input = input.with_initial_text(initial);
            }
            input.interact_text()
        })
        .await
        .context("Prompt task panicked")?
        .context("Failed to read input")?;

        Ok(answer.trim().to_string())
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn render_label(item: &ChoiceItem) -> String {
    match &item.description {
        Some(description) => format!("{}  ({})", item.label, description),
        None => item.label.clone(),
    }
}

#[async_trait]
impl PromptSurface for TerminalPrompt {
    async fn choose_one(
        &self,
        request: &ChoiceRequest,
        options: OptionSource<'_>,
    ) -> Result<Option<usize>> {
        let bar = self.busy(&request.title);
        let items = options.await;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        let items = items?;
        if items.is_empty() {
            bail!("Nothing to choose for '{}'", request.title);
        }

        debug!(title = %request.title, count = items.len(), "Showing choice prompt");
        let labels = items.iter().map(render_label).collect();
        let title = if request.placeholder.is_empty() {
            request.title.clone()
        } else {
            format!("{} - {}", request.title, request.placeholder)
        };
        Self::select(title, labels).await
    }

    async fn text_input(&self, request: &TextRequest) -> Result<Option<String>> {
        if let Some(message) = &request.validation_message {
            eprintln!("  {}", message);
        }
        let title = if request.placeholder.is_empty() {
            request.title.clone()
        } else {
            format!("{} ({})", request.title, request.placeholder)
        };
        // Empty text goes back to the caller's validation rather than dismissing
        Self::read_line(title, request.initial_value.clone())
            .await
            .map(Some)
    }

    async fn browse_folder(&self, title: &str) -> Result<Option<PathBuf>> {
        loop {
            let answer = Self::read_line(title.to_string(), None).await?;
            if answer.is_empty() {
                return Ok(None);
            }
            let path = expand_home(&answer);
            if path.is_dir() {
                return Ok(Some(path));
            }
            eprintln!("  {} is not a directory", path.display());
        }
    }

    async fn confirm(&self, message: &str, affirmative: &str, negative: &str) -> Result<bool> {
        let choice = Self::select(
            message.to_string(),
            vec![affirmative.to_string(), negative.to_string()],
        )
        .await?;
        Ok(choice == Some(0))
    }

    async fn open_file(&self, path: &Path) -> Result<()> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        eprintln!();
        eprintln!("── {} ──", path.display());
        for line in content.lines() {
            eprintln!("  {}", line);
        }
        eprintln!();
        Ok(())
    }

    async fn notify_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}

fn expand_home(answer: &str) -> PathBuf {
    if let Some(rest) = answer.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(answer)
}
