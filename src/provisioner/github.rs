use super::browser::open_in_browser;
use super::strategy::{PipelineProvisioner, QueuedPipeline};
use crate::cloud::{InMemoryCloud, RunRequest};
use crate::model::{AzureResource, PipelineService, RunSuffix, WizardInputs};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// GitHub Actions workflow in the repository itself
pub struct GitHubActionsProvisioner {
    cloud: Arc<InMemoryCloud>,
    suffix: RunSuffix,
    browse: bool,
}

impl GitHubActionsProvisioner {
    pub fn new(cloud: Arc<InMemoryCloud>, suffix: RunSuffix, browse: bool) -> Self {
        Self {
            cloud,
            suffix,
            browse,
        }
    }

    /// Name of the repository secret holding the deployment credentials
    pub fn credentials_secret(&self) -> String {
        format!("AZURE_CREDENTIALS_{}", self.suffix.as_str().to_uppercase())
    }
}

fn workflow_name(inputs: &WizardInputs) -> String {
    let source = inputs
        .target_resource
        .resource
        .as_ref()
        .map(|r| r.name.as_str())
        .or_else(|| {
            inputs
                .source_repository
                .as_ref()
                .map(|r| r.repository_name.as_str())
        })
        .unwrap_or("build");

    let mut name = String::new();
    for c in source.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('-') {
            name.push('-');
        }
    }
    let name = name.trim_end_matches('-');
    if name.is_empty() {
        "build".to_string()
    } else {
        name.to_string()
    }
}

#[async_trait]
impl PipelineProvisioner for GitHubActionsProvisioner {
    fn service(&self) -> PipelineService {
        PipelineService::GitHubActions
    }

    fn requires_remote_project(&self) -> bool {
        false
    }

    async fn create_prerequisites(&self, inputs: &mut WizardInputs) -> Result<()> {
        let Some(resource) = inputs.target_resource.resource.clone() else {
            return Ok(());
        };
        let repository = inputs
            .source_repository
            .as_ref()
            .context("Repository context has not been resolved")?;

        let secret = self.credentials_secret();
        self.cloud
            .create_service_connection(&repository.repository_id, &secret, &resource)?;
        info!(secret = %secret, repository = %repository.repository_id, "Stored deployment credentials");
        inputs.pipeline_parameters.service_connection = Some(secret);
        Ok(())
    }

    fn pipeline_file_path(&self, inputs: &WizardInputs) -> PathBuf {
        Path::new(WORKFLOWS_DIR).join(format!("{}.yml", workflow_name(inputs)))
    }

    async fn create_and_queue_pipeline(&self, inputs: &WizardInputs) -> Result<QueuedPipeline> {
        let Some(commit_id) = inputs.commit_id() else {
            bail!("Workflow file has not been committed");
        };
        let repository = inputs
            .source_repository
            .as_ref()
            .context("Repository context has not been resolved")?;
        let file = inputs
            .pipeline_parameters
            .pipeline_file_name
            .clone()
            .context("Workflow file has not been written")?;
        let name = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| workflow_name(inputs));

        // pushing the workflow is what triggers the first run
        let run = self.cloud.queue_run(RunRequest {
            service: PipelineService::GitHubActions,
            scope: repository.repository_id.clone(),
            pipeline_name: name,
            file,
            commit_id: commit_id.to_string(),
        });
        Ok(QueuedPipeline {
            id: run.id.to_string(),
            name: run.pipeline_name,
            url: run.url,
        })
    }

    async fn post_pipeline_creation_steps(
        &self,
        inputs: &WizardInputs,
        target: Option<&AzureResource>,
    ) -> Result<()> {
        let (Some(resource), Some(repository)) = (target, inputs.source_repository.as_ref())
        else {
            return Ok(());
        };
        let pipeline = format!("{}/{}", repository.repository_id, workflow_name(inputs));
        self.cloud.link_deployment(resource, &pipeline);
        Ok(())
    }

    async fn browse_queued_pipeline(&self, queued: &QueuedPipeline) -> Result<()> {
        if !self.browse {
            info!(url = %queued.url, "Workflow run queued");
            return Ok(());
        }
        if let Err(err) = open_in_browser(&queued.url).await {
            warn!(error = %err, url = %queued.url, "Could not open the workflow run in a browser");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AzureResource;

    #[test]
    fn test_workflow_name_prefers_resource() {
        let mut inputs = WizardInputs::new();
        assert_eq!(workflow_name(&inputs), "build");

        inputs.target_resource.resource = Some(AzureResource {
            id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/Shop_Prod"
                .to_string(),
            name: "Shop_Prod".to_string(),
            kind: "app,linux".to_string(),
            location: String::new(),
        });
        assert_eq!(workflow_name(&inputs), "shop-prod");
    }
}
