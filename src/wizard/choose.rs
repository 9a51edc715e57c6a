//! Single-choice prompts that map the picked label back to a value

use super::error::WizardError;
use super::step::WizardStep;
use crate::prompt::{ChoiceItem, ChoiceRequest, PromptSurface};
use anyhow::anyhow;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::Mutex;
use thiserror::Error;

/// Raised inside the option future when the loaded list is empty
#[derive(Debug, Error)]
#[error("no options to choose from")]
struct EmptyOptions;

/// Options paired with the value each one stands for; may still be loading
pub(crate) type ValuedOptions<'a, T> = BoxFuture<'a, anyhow::Result<Vec<(ChoiceItem, T)>>>;

/// Shows `request` while `options` loads, then returns the value of the picked item.
///
/// An empty list maps to `on_empty`, a dismissed prompt to `UserCancelled`, and
/// a failed load to `RemoteCall` for `step`.
pub(crate) async fn choose<T: Send>(
    prompt: &dyn PromptSurface,
    request: &ChoiceRequest,
    step: WizardStep,
    operation: &'static str,
    options: ValuedOptions<'_, T>,
    on_empty: impl FnOnce() -> WizardError,
) -> Result<T, WizardError> {
    let values: Mutex<Vec<T>> = Mutex::new(Vec::new());

    let labels = async {
        let items = options.await?;
        if items.is_empty() {
            return Err(anyhow::Error::new(EmptyOptions));
        }
        let (labels, loaded): (Vec<ChoiceItem>, Vec<T>) = items.into_iter().unzip();
        if let Ok(mut slot) = values.lock() {
            *slot = loaded;
        }
        Ok(labels)
    }
    .boxed();

    let picked = prompt.choose_one(request, labels).await;
    let index = match picked {
        Ok(Some(index)) => index,
        Ok(None) => return Err(WizardError::UserCancelled),
        Err(err) if err.is::<EmptyOptions>() => return Err(on_empty()),
        Err(err) => return Err(WizardError::remote(step, operation)(err)),
    };

    let values = values
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    values.into_iter().nth(index).ok_or_else(|| {
        WizardError::remote(step, operation)(anyhow!(
            "prompt returned choice {} outside the option list",
            index
        ))
    })
}

/// Options that are already known
pub(crate) fn ready<'a, T: Send + 'a>(items: Vec<(ChoiceItem, T)>) -> ValuedOptions<'a, T> {
    async move { Ok(items) }.boxed()
}
