use super::checkin::check_in;
use super::context::WizardContext;
use super::error::WizardError;
use super::project::resolve_remote_project;
use super::repository::{resolve_repository_context, WizardRequest};
use super::step::WizardStep;
use super::target::resolve_target_resource;
use super::template::select_template;
use crate::model::{PipelineService, WizardInputs};
use crate::provisioner::{PipelineProvisioner, QueuedPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct WizardOutcome {
    pub service: PipelineService,
    pub queued: QueuedPipeline,
    /// Repository-relative path of the committed pipeline file
    pub pipeline_file: PathBuf,
    pub commit_id: String,
    pub inputs: WizardInputs,
}

/// Runs the configure-pipeline flow end to end
pub struct WizardOrchestrator {
    ctx: WizardContext,
}

impl WizardOrchestrator {
    pub fn new(ctx: WizardContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &WizardContext {
        &self.ctx
    }

    /// Every outcome is reported to telemetry, attributed to the step that was
    /// running when it happened.
    pub async fn run(&self, request: &WizardRequest) -> Result<WizardOutcome, WizardError> {
        let telemetry = &self.ctx.telemetry;
        telemetry.record_started(
            request.workspace_folders.len(),
            request.target_handle.is_some(),
        );

        let result = self.execute(request).await;
        let step = telemetry
            .current_step()
            .unwrap_or_else(|| WizardStep::Start.to_string());
        match &result {
            Ok(outcome) => telemetry.record_completed(&outcome.queued.url),
            Err(err) if err.is_cancelled() => {
                info!(step = %step, "Wizard cancelled");
                telemetry.record_cancelled(&step);
            }
            Err(err) => {
                warn!(step = %step, error = %err, "Wizard failed");
                telemetry.record_failure(&step, &err.to_string());
            }
        }
        result
    }

    fn mark(&self, step: WizardStep) {
        debug!(step = %step, "Entering step");
        self.ctx.telemetry.mark_step(step.as_str());
    }

    async fn execute(&self, request: &WizardRequest) -> Result<WizardOutcome, WizardError> {
        self.mark(WizardStep::Start);
        let signed_in = self
            .ctx
            .sessions
            .wait_for_login()
            .await
            .map_err(WizardError::remote(WizardStep::Start, "Wait for sign-in"))?;
        if !signed_in {
            return Err(WizardError::NotSignedIn);
        }

        let mut inputs = WizardInputs::new();
        self.mark(WizardStep::GatherInputs);
        let provisioner = self.gather_inputs(request, &mut inputs).await?;

        self.mark(WizardStep::CreatePrerequisites);
        provisioner
            .create_prerequisites(&mut inputs)
            .await
            .map_err(WizardError::remote(
                WizardStep::CreatePrerequisites,
                "Create prerequisites",
            ))?;

        self.mark(WizardStep::CheckIn);
        let (template, repository) = match (
            inputs.pipeline_parameters.template.clone(),
            inputs.source_repository.clone(),
        ) {
            (Some(template), Some(repository)) => (template, repository),
            _ => {
                return Err(WizardError::remote(WizardStep::CheckIn, "Check in pipeline")(
                    anyhow::anyhow!("inputs are incomplete after gathering"),
                ))
            }
        };
        check_in(
            &self.ctx,
            provisioner.as_ref(),
            &template,
            &repository,
            &mut inputs,
        )
        .await?;

        self.mark(WizardStep::CreateAndQueue);
        let queued = provisioner
            .create_and_queue_pipeline(&inputs)
            .await
            .map_err(WizardError::remote(
                WizardStep::CreateAndQueue,
                "Create and queue pipeline",
            ))?;
        info!(pipeline = %queued.name, url = %queued.url, "Pipeline queued");

        self.mark(WizardStep::PostSteps);
        provisioner
            .post_pipeline_creation_steps(&inputs, inputs.target_resource.resource.as_ref())
            .await
            .map_err(WizardError::remote(WizardStep::PostSteps, "Link deployment"))?;

        self.mark(WizardStep::Display);
        provisioner
            .browse_queued_pipeline(&queued)
            .await
            .map_err(WizardError::remote(WizardStep::Display, "Show pipeline"))?;

        self.mark(WizardStep::Done);
        Ok(WizardOutcome {
            service: provisioner.service(),
            pipeline_file: inputs
                .pipeline_parameters
                .pipeline_file_name
                .clone()
                .unwrap_or_default(),
            commit_id: inputs.commit_id().unwrap_or_default().to_string(),
            queued,
            inputs,
        })
    }

    async fn gather_inputs(
        &self,
        request: &WizardRequest,
        inputs: &mut WizardInputs,
    ) -> Result<Arc<dyn PipelineProvisioner>, WizardError> {
        self.mark(WizardStep::ResolveRepository);
        let repository = resolve_repository_context(&self.ctx, request, inputs).await?;

        let provisioner = self
            .ctx
            .provisioners
            .select(repository.provider)
            .map_err(WizardError::remote(
                WizardStep::GatherInputs,
                "Select pipeline service",
            ))?;
        self.ctx
            .telemetry
            .record_fact("pipelineService", provisioner.service().name());

        self.mark(WizardStep::SelectTemplate);
        let template = select_template(
            &self.ctx,
            &repository.local_path,
            repository.provider,
            provisioner.service(),
            inputs.target_resource.resource.as_ref(),
        )
        .await?;
        inputs.pipeline_parameters.template = Some(template.clone());

        if !inputs.has_target_resource() {
            self.mark(WizardStep::ResolveTarget);
            resolve_target_resource(&self.ctx, &template, inputs).await?;
        }

        if provisioner.requires_remote_project() {
            self.mark(WizardStep::ResolveProject);
            resolve_remote_project(&self.ctx, &repository.identity, inputs).await?;
        }

        Ok(provisioner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::{EnvironmentSpec, InMemoryCloud};
    use crate::git::MockGitContext;
    use crate::model::RunSuffix;
    use crate::progress::{ProgressEvent, RecordingHandler};
    use crate::prompt::{ScriptedAnswer, ScriptedPrompt};
    use crate::provisioner::LocalProvisionerFactory;
    use crate::templates::{LocalTemplates, TemplateCatalog};
    use tempfile::TempDir;

    struct Harness {
        orchestrator: WizardOrchestrator,
        prompt: Arc<ScriptedPrompt>,
        git: Arc<MockGitContext>,
        cloud: Arc<InMemoryCloud>,
        progress: Arc<RecordingHandler>,
    }

    fn harness(spec: EnvironmentSpec, git: MockGitContext, answers: Vec<ScriptedAnswer>) -> Harness {
        let cloud = Arc::new(InMemoryCloud::new(spec));
        let git = Arc::new(git);
        let prompt = Arc::new(ScriptedPrompt::with_answers(answers));
        let progress = Arc::new(RecordingHandler::new());
        let suffix = RunSuffix::fixed("ab12c").unwrap();
        let ctx = WizardContext::offline(
            cloud.clone(),
            git.clone(),
            Arc::new(LocalTemplates::new(TemplateCatalog::with_defaults())),
            Arc::new(LocalProvisionerFactory::new(cloud.clone(), suffix)),
            prompt.clone(),
            progress.clone(),
        );
        Harness {
            orchestrator: WizardOrchestrator::new(ctx),
            prompt,
            git,
            cloud,
            progress,
        }
    }

    fn node_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        dir
    }

    const SPEC: &str = r#"
user: jane@contoso.com
tenant_id: tenant-1
subscriptions:
  - id: sub-1
    name: Production
    resources:
      - name: shop-web
        kind: app,linux
organizations:
  - name: contoso
    projects:
      - name: Web
        repositories: [shop]
"#;

    #[tokio::test]
    async fn test_signed_out_session_stops_before_any_prompt() {
        let mut spec = EnvironmentSpec::from_yaml(SPEC).unwrap();
        spec.signed_in = false;
        let repo = node_repo();
        let h = harness(spec, MockGitContext::new(repo.path()), vec![]);

        let err = h
            .orchestrator
            .run(&WizardRequest::new(vec![repo.path().to_path_buf()]))
            .await
            .unwrap_err();

        assert!(matches!(err, WizardError::NotSignedIn));
        assert_eq!(h.prompt.prompt_count(), 0);
        assert!(h.progress.events().iter().any(|e| matches!(
            e,
            ProgressEvent::Failed { step, .. } if step == "Start"
        )));
    }

    #[tokio::test]
    async fn test_github_repository_to_linux_web_app() {
        let repo = node_repo();
        let git = MockGitContext::new(repo.path())
            .with_remote("origin", Some("https://github.com/octo/shop.git"));
        git.push_succeeds("c0ffee");
        let h = harness(
            EnvironmentSpec::from_yaml(SPEC).unwrap(),
            git,
            vec![
                ScriptedAnswer::choose("Node.js to Linux Web App"),
                ScriptedAnswer::choose("Production"),
                ScriptedAnswer::choose("shop-web"),
                ScriptedAnswer::Confirm(true),
            ],
        );

        let outcome = h
            .orchestrator
            .run(&WizardRequest::new(vec![repo.path().to_path_buf()]))
            .await
            .unwrap();

        assert_eq!(outcome.service, PipelineService::GitHubActions);
        assert_eq!(outcome.commit_id, "c0ffee");
        assert_eq!(outcome.pipeline_file, PathBuf::from(".github/workflows/shop-web.yml"));
        assert_eq!(outcome.queued.url, "https://github.com/octo/shop/actions/runs/1");
        assert_eq!(h.git.written_files().len(), 1);
        assert_eq!(h.cloud.deployment_links().len(), 1);
        assert_eq!(h.prompt.remaining_answers(), 0);
        assert!(h
            .progress
            .events()
            .iter()
            .any(|e| matches!(e, ProgressEvent::Completed { .. })));
    }

    #[tokio::test]
    async fn test_discarding_the_pipeline_cancels() {
        let repo = node_repo();
        let git = MockGitContext::new(repo.path())
            .with_remote("origin", Some("https://github.com/octo/shop.git"));
        let h = harness(
            EnvironmentSpec::from_yaml(SPEC).unwrap(),
            git,
            vec![
                ScriptedAnswer::choose("Node.js to Linux Web App"),
                ScriptedAnswer::choose("Production"),
                ScriptedAnswer::choose("shop-web"),
                ScriptedAnswer::Confirm(false),
            ],
        );

        let err = h
            .orchestrator
            .run(&WizardRequest::new(vec![repo.path().to_path_buf()]))
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(h.git.push_attempts(), 0);
        assert!(h.cloud.queued_runs().is_empty());
        assert!(h.progress.events().iter().any(|e| matches!(
            e,
            ProgressEvent::Cancelled { step } if step == "CheckIn"
        )));
    }
}
