use super::azure::AzurePipelinesProvisioner;
use super::github::GitHubActionsProvisioner;
use super::strategy::{PipelineProvisioner, ProvisionerFactory};
use crate::cloud::InMemoryCloud;
use crate::model::{PipelineService, RepositoryProvider, RunSuffix};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Builds provisioners that record their work in an [`InMemoryCloud`].
///
/// Azure Repos repositories always get Azure Pipelines; GitHub repositories get
/// the configured service.
pub struct LocalProvisionerFactory {
    cloud: Arc<InMemoryCloud>,
    suffix: RunSuffix,
    github_service: PipelineService,
    browse: bool,
}

impl LocalProvisionerFactory {
    pub fn new(cloud: Arc<InMemoryCloud>, suffix: RunSuffix) -> Self {
        Self {
            cloud,
            suffix,
            github_service: PipelineService::GitHubActions,
            browse: false,
        }
    }

    pub fn with_github_service(mut self, service: PipelineService) -> Self {
        self.github_service = service;
        self
    }

    pub fn with_browse(mut self, browse: bool) -> Self {
        self.browse = browse;
        self
    }

    pub fn service_for(&self, provider: RepositoryProvider) -> PipelineService {
        match provider {
            RepositoryProvider::AzureRepos => PipelineService::AzurePipelines,
            RepositoryProvider::GitHub => self.github_service,
        }
    }
}

impl ProvisionerFactory for LocalProvisionerFactory {
    fn select(&self, provider: RepositoryProvider) -> Result<Arc<dyn PipelineProvisioner>> {
        let service = self.service_for(provider);
        debug!(provider = %provider, service = %service, "Selected pipeline service");

        let provisioner: Arc<dyn PipelineProvisioner> = match service {
            PipelineService::AzurePipelines => Arc::new(AzurePipelinesProvisioner::new(
                self.cloud.clone(),
                self.suffix.clone(),
                self.browse,
            )),
            PipelineService::GitHubActions => Arc::new(GitHubActionsProvisioner::new(
                self.cloud.clone(),
                self.suffix.clone(),
                self.browse,
            )),
        };
        Ok(provisioner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::EnvironmentSpec;
    use crate::model::{
        AzureResource, GitRepositoryParameters, RemoteProject, RepositoryIdentity, WizardInputs,
    };
    use std::path::PathBuf;

    fn cloud() -> Arc<InMemoryCloud> {
        Arc::new(InMemoryCloud::new(EnvironmentSpec::empty("jane@contoso.com")))
    }

    fn suffix() -> RunSuffix {
        RunSuffix::fixed("ab12c").unwrap()
    }

    fn inputs_for(identity: RepositoryIdentity) -> WizardInputs {
        let mut inputs = WizardInputs::new();
        inputs.source_repository = Some(GitRepositoryParameters {
            provider: identity.provider(),
            repository_id: identity.repository_id(),
            repository_name: identity.repository_name().to_string(),
            identity,
            remote_name: "origin".to_string(),
            remote_url: String::new(),
            branch: "main".to_string(),
            commit_id: String::new(),
            local_path: PathBuf::from("/repo"),
            root_path: PathBuf::from("/repo"),
            working_directory: ".".to_string(),
        });
        inputs.pipeline_parameters.working_directory = ".".to_string();
        inputs.target_resource.resource = Some(AzureResource {
            id: "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Web/sites/shop"
                .to_string(),
            name: "shop".to_string(),
            kind: "app,linux".to_string(),
            location: String::new(),
        });
        inputs
    }

    fn github() -> RepositoryIdentity {
        RepositoryIdentity::GitHub {
            owner: "octo".to_string(),
            repository: "shop".to_string(),
        }
    }

    #[test]
    fn test_select_by_provider() {
        let factory = LocalProvisionerFactory::new(cloud(), suffix());
        assert_eq!(
            factory.select(RepositoryProvider::AzureRepos).unwrap().service(),
            PipelineService::AzurePipelines
        );
        assert_eq!(
            factory.select(RepositoryProvider::GitHub).unwrap().service(),
            PipelineService::GitHubActions
        );

        let factory = factory.with_github_service(PipelineService::AzurePipelines);
        let provisioner = factory.select(RepositoryProvider::GitHub).unwrap();
        assert!(provisioner.requires_remote_project());
    }

    #[tokio::test]
    async fn test_azure_new_organization_prerequisites() {
        let cloud = cloud();
        let factory = LocalProvisionerFactory::new(cloud.clone(), suffix())
            .with_github_service(PipelineService::AzurePipelines);
        let provisioner = factory.select(RepositoryProvider::GitHub).unwrap();

        let mut inputs = inputs_for(github());
        inputs.is_new_organization = true;
        inputs.organization_name = Some("jane-shop".to_string());
        inputs.project = Some(RemoteProject {
            id: String::new(),
            name: "AzurePipelines".to_string(),
        });

        provisioner.create_prerequisites(&mut inputs).await.unwrap();

        assert_eq!(cloud.organization_names(), vec!["jane-shop"]);
        assert!(!inputs.project.as_ref().unwrap().id.is_empty());
        assert_eq!(
            inputs.pipeline_parameters.service_connection.as_deref(),
            Some("shop-ab12c")
        );
        assert_eq!(
            provisioner.pipeline_file_path(&inputs),
            PathBuf::from("azure-pipelines.yml")
        );
    }

    #[tokio::test]
    async fn test_queue_requires_commit() {
        let cloud = cloud();
        let provisioner = LocalProvisionerFactory::new(cloud.clone(), suffix())
            .select(RepositoryProvider::GitHub)
            .unwrap();
        let mut inputs = inputs_for(github());

        provisioner.create_prerequisites(&mut inputs).await.unwrap();
        assert_eq!(
            inputs.pipeline_parameters.service_connection.as_deref(),
            Some("AZURE_CREDENTIALS_AB12C")
        );
        let path = provisioner.pipeline_file_path(&inputs);
        assert_eq!(path, PathBuf::from(".github/workflows/shop.yml"));
        inputs.pipeline_parameters.pipeline_file_name = Some(path);

        assert!(provisioner.create_and_queue_pipeline(&inputs).await.is_err());

        if let Some(repo) = inputs.source_repository.as_mut() {
            repo.commit_id = "abc123".to_string();
        }
        let queued = provisioner.create_and_queue_pipeline(&inputs).await.unwrap();
        assert_eq!(queued.name, "shop");
        assert_eq!(queued.url, "https://github.com/octo/shop/actions/runs/1");

        provisioner
            .post_pipeline_creation_steps(&inputs, inputs.target_resource.resource.as_ref())
            .await
            .unwrap();
        assert_eq!(cloud.deployment_links()[0].pipeline, "octo/shop/shop");
        provisioner.browse_queued_pipeline(&queued).await.unwrap();
    }
}
