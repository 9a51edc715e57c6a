use crate::model::{AzureResource, PipelineService, RepositoryProvider, WizardInputs};
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Pipeline created and queued by a provisioner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPipeline {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Service-specific side of pipeline creation
#[async_trait]
pub trait PipelineProvisioner: Send + Sync {
    fn service(&self) -> PipelineService;

    /// Whether an organization/project container must be resolved first
    fn requires_remote_project(&self) -> bool;

    /// Creates whatever must exist before the pipeline file is committed
    /// (organization, project, service connection). May write
    /// `project` and `pipeline_parameters.service_connection`.
    async fn create_prerequisites(&self, inputs: &mut WizardInputs) -> Result<()>;

    /// Repository-relative destination of the pipeline definition
    fn pipeline_file_path(&self, inputs: &WizardInputs) -> PathBuf;

    /// Requires a committed pipeline file
    async fn create_and_queue_pipeline(&self, inputs: &WizardInputs) -> Result<QueuedPipeline>;

    async fn post_pipeline_creation_steps(
        &self,
        inputs: &WizardInputs,
        target: Option<&AzureResource>,
    ) -> Result<()>;

    async fn browse_queued_pipeline(&self, queued: &QueuedPipeline) -> Result<()>;
}

/// Picks the provisioner for a repository provider, once per run
pub trait ProvisionerFactory: Send + Sync {
    fn select(&self, provider: RepositoryProvider) -> Result<Arc<dyn PipelineProvisioner>>;
}
