use super::choose::{choose, ready};
use super::context::WizardContext;
use super::error::WizardError;
use super::step::WizardStep;
use crate::model::{AzureResource, PipelineService, PipelineTemplate, RepositoryProvider};
use crate::prompt::{ChoiceItem, ChoiceRequest};
use std::path::Path;
use tracing::info;

const STEP: WizardStep = WizardStep::SelectTemplate;

fn describe(template: &PipelineTemplate) -> String {
    match template.target_kind {
        Some(kind) => format!("{} / {}", template.language, kind),
        None => template.language.clone(),
    }
}

/// Asks the user to pick one of the templates that fit the repository.
///
/// No prompt is shown when nothing fits.
pub(crate) async fn select_template(
    ctx: &WizardContext,
    repo_path: &Path,
    provider: RepositoryProvider,
    service: PipelineService,
    target: Option<&AzureResource>,
) -> Result<PipelineTemplate, WizardError> {
    let templates = ctx
        .analyzer
        .applicable_templates(repo_path, provider, service, target)
        .await
        .map_err(WizardError::remote(STEP, "Analyze repository"))?;
    if templates.is_empty() {
        return Err(WizardError::NoApplicableTemplate);
    }

    let options = templates
        .into_iter()
        .map(|t| {
            let item = ChoiceItem::new(t.label.clone()).with_description(describe(&t));
            (item, t)
        })
        .collect();
    let template = choose(
        ctx.prompt.as_ref(),
        &ChoiceRequest::new("Select a pipeline template", service.name()),
        STEP,
        "List templates",
        ready(options),
        || WizardError::NoApplicableTemplate,
    )
    .await?;

    info!(template = %template.label, service = %service, "Selected pipeline template");
    ctx.telemetry.record_fact("template", template.label.clone());
    Ok(template)
}
