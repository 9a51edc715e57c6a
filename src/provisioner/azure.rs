use super::browser::open_in_browser;
use super::strategy::{PipelineProvisioner, QueuedPipeline};
use crate::cloud::{InMemoryCloud, RunRequest};
use crate::model::{AzureResource, PipelineService, RemoteProject, RunSuffix, WizardInputs};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub const AZURE_PIPELINES_FILE: &str = "azure-pipelines.yml";

/// Azure Pipelines inside an organization/project container
pub struct AzurePipelinesProvisioner {
    cloud: Arc<InMemoryCloud>,
    suffix: RunSuffix,
    browse: bool,
}

impl AzurePipelinesProvisioner {
    pub fn new(cloud: Arc<InMemoryCloud>, suffix: RunSuffix, browse: bool) -> Self {
        Self {
            cloud,
            suffix,
            browse,
        }
    }

    fn container(inputs: &WizardInputs) -> Result<(&str, &RemoteProject)> {
        let organization = inputs
            .organization_name
            .as_deref()
            .context("Organization has not been resolved")?;
        let project = inputs
            .project
            .as_ref()
            .context("Project has not been resolved")?;
        Ok((organization, project))
    }

    fn pipeline_scope(inputs: &WizardInputs) -> Result<String> {
        let (organization, project) = Self::container(inputs)?;
        Ok(format!("{}/{}", organization, project.name))
    }
}

#[async_trait]
impl PipelineProvisioner for AzurePipelinesProvisioner {
    fn service(&self) -> PipelineService {
        PipelineService::AzurePipelines
    }

    fn requires_remote_project(&self) -> bool {
        true
    }

    async fn create_prerequisites(&self, inputs: &mut WizardInputs) -> Result<()> {
        let (organization, project) = Self::container(inputs)?;
        let organization = organization.to_string();
        let project = project.clone();

        if inputs.is_new_organization {
            self.cloud.create_organization(&organization)?;
            info!(organization = %organization, "Created organization");
        }

        if project.id.is_empty() {
            let created = self.cloud.create_project(&organization, &project.name)?;
            info!(organization = %organization, project = %created.name, "Created project");
            inputs.project = Some(RemoteProject {
                id: created.id,
                name: created.name,
            });
        }

        if let Some(resource) = inputs.target_resource.resource.clone() {
            let scope = Self::pipeline_scope(inputs)?;
            let name = format!("{}-{}", resource.name, self.suffix);
            let connection = self
                .cloud
                .create_service_connection(&scope, &name, &resource)?;
            info!(connection = %connection.name, scope = %scope, "Created service connection");
            inputs.pipeline_parameters.service_connection = Some(connection.name);
        }
        Ok(())
    }

    fn pipeline_file_path(&self, inputs: &WizardInputs) -> PathBuf {
        match inputs.pipeline_parameters.working_directory.as_str() {
            "" | "." => PathBuf::from(AZURE_PIPELINES_FILE),
            dir => PathBuf::from(dir).join(AZURE_PIPELINES_FILE),
        }
    }

    async fn create_and_queue_pipeline(&self, inputs: &WizardInputs) -> Result<QueuedPipeline> {
        let Some(commit_id) = inputs.commit_id() else {
            bail!("Pipeline file has not been committed");
        };
        let repository = inputs
            .source_repository
            .as_ref()
            .context("Repository context has not been resolved")?;
        let file = inputs
            .pipeline_parameters
            .pipeline_file_name
            .clone()
            .context("Pipeline file has not been written")?;

        let run = self.cloud.queue_run(RunRequest {
            service: PipelineService::AzurePipelines,
            scope: Self::pipeline_scope(inputs)?,
            pipeline_name: repository.repository_name.clone(),
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
        let Some(resource) = target else {
            return Ok(());
        };
        let repository = inputs
            .source_repository
            .as_ref()
            .context("Repository context has not been resolved")?;
        let pipeline = format!(
            "{}/{}",
            Self::pipeline_scope(inputs)?,
            repository.repository_name
        );
        self.cloud.link_deployment(resource, &pipeline);
        Ok(())
    }

    async fn browse_queued_pipeline(&self, queued: &QueuedPipeline) -> Result<()> {
        if !self.browse {
            info!(url = %queued.url, "Pipeline queued");
            return Ok(());
        }
        if let Err(err) = open_in_browser(&queued.url).await {
            warn!(error = %err, url = %queued.url, "Could not open the pipeline in a browser");
        }
        Ok(())
    }
}
