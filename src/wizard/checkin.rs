use super::context::WizardContext;
use super::error::WizardError;
use super::step::WizardStep;
use crate::model::{GitRepositoryParameters, PipelineTemplate, WizardInputs};
use crate::provisioner::PipelineProvisioner;
use tracing::{info, warn};

const STEP: WizardStep = WizardStep::CheckIn;

/// Writes the rendered pipeline into the repository, then asks to commit and
/// push until a push succeeds or the user discards the file.
///
/// Sets `pipeline_parameters.pipeline_file_name`, and `commit_id` on success.
pub(crate) async fn check_in(
    ctx: &WizardContext,
    provisioner: &dyn PipelineProvisioner,
    template: &PipelineTemplate,
    repository: &GitRepositoryParameters,
    inputs: &mut WizardInputs,
) -> Result<(), WizardError> {
    let destination = provisioner.pipeline_file_path(inputs);
    let content = ctx
        .renderer
        .render(template, inputs)
        .await
        .map_err(WizardError::remote(STEP, "Render pipeline"))?;
    let written = ctx
        .git
        .add_file(&repository.root_path, &content, &destination)
        .await
        .map_err(WizardError::remote(STEP, "Write pipeline file"))?;
    info!(file = %written.display(), "Wrote pipeline file");
    inputs.pipeline_parameters.pipeline_file_name = Some(written.clone());

    if let Err(err) = ctx.prompt.open_file(&repository.root_path.join(&written)).await {
        warn!(error = %err, "Could not open the pipeline file for review");
    }

    let message = format!(
        "Commit and push {} to {}/{} to start the pipeline?",
        written.display(),
        repository.remote_name,
        repository.branch
    );
    loop {
        let confirmed = ctx
            .prompt
            .confirm(&message, "Commit & push", "Discard pipeline")
            .await
            .map_err(WizardError::remote(STEP, "Confirm commit"))?;
        if !confirmed {
            ctx.telemetry.record_fact("pipelineDiscarded", "true");
            return Err(WizardError::UserCancelled);
        }

        match ctx.git.commit_and_push(&written, repository).await {
            Ok(commit_id) if !commit_id.trim().is_empty() => {
                info!(commit = %commit_id, "Pushed pipeline file");
                if let Some(source) = inputs.source_repository.as_mut() {
                    source.commit_id = commit_id;
                }
                return Ok(());
            }
            Ok(_) => {
                warn!("Push reported no commit id");
                ctx.prompt
                    .notify_error("The push did not report a commit id. Try again.")
                    .await;
            }
            Err(err) => {
                warn!(error = %err, "Commit and push failed");
                ctx.prompt
                    .notify_error(&format!(
                        "Commit and push failed: {:#}\nResolve the problem (for example pull the latest changes) and try again.",
                        err
                    ))
                    .await;
            }
        }
    }
}
