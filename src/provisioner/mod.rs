//! Pipeline provisioning strategies, one per pipeline service

mod azure;
mod browser;
mod factory;
mod github;
mod strategy;

pub use azure::{AzurePipelinesProvisioner, AZURE_PIPELINES_FILE};
pub use factory::LocalProvisionerFactory;
pub use github::{GitHubActionsProvisioner, WORKFLOWS_DIR};
pub use strategy::{PipelineProvisioner, ProvisionerFactory, QueuedPipeline};
