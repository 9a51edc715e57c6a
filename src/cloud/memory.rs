//! Offline cloud backed by an [`EnvironmentSpec`]
//!
//! Serves the session, deployment-target and project lookups, and records what
//! the local provisioners create so a run can be inspected afterwards.

use super::client::{
    Organization, Project, RemoteProjectClient, RemoteRepository, SessionProvider,
    TargetResourceClient,
};
use super::environment::{EnvironmentSpec, OrganizationSpec, ProjectSpec};
use super::naming::organization_name_problem;
use crate::model::{
    AzureResource, AzureSession, PipelineService, SessionCredentials, Subscription, TargetKind,
};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com/";

/// Lookup that can be forced to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudOperation {
    Subscriptions,
    Resources,
    Organizations,
    Projects,
    Repository,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConnection {
    pub id: String,
    pub name: String,
    /// `org/project` for Azure Pipelines, `owner/repo` for GitHub Actions
    pub scope: String,
    pub resource_id: String,
}

/// Deployment target wired to a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentLink {
    pub resource_id: String,
    /// Scoped pipeline name, e.g. `contoso/Web/shop`
    pub pipeline: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub service: PipelineService,
    pub scope: String,
    pub pipeline_name: String,
    pub file: PathBuf,
    pub commit_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedRun {
    pub id: u64,
    pub service: PipelineService,
    pub scope: String,
    pub pipeline_name: String,
    pub file: PathBuf,
    pub commit_id: String,
    pub url: String,
}

struct CloudState {
    spec: EnvironmentSpec,
    failures: HashMap<CloudOperation, String>,
    service_connections: Vec<ServiceConnection>,
    runs: Vec<QueuedRun>,
    deployments: Vec<DeploymentLink>,
}

pub struct InMemoryCloud {
    state: Mutex<CloudState>,
}

fn organization_id(name: &str) -> String {
    format!("org-{}", name.to_lowercase())
}

fn project_id(organization: &str, project: &str) -> String {
    format!("{}.{}", organization, project)
        .to_lowercase()
        .replace(' ', "-")
}

fn repository_id(organization: &str, project: &str, repository: &str) -> String {
    format!("{}.{}.{}", organization, project, repository)
        .to_lowercase()
        .replace(' ', "-")
}

fn to_project(organization: &str, project: &ProjectSpec) -> Project {
    Project {
        id: project_id(organization, &project.name),
        name: project.name.clone(),
    }
}

impl InMemoryCloud {
    pub fn new(spec: EnvironmentSpec) -> Self {
        Self {
            state: Mutex::new(CloudState {
                spec,
                failures: HashMap::new(),
                service_connections: Vec::new(),
                runs: Vec::new(),
                deployments: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CloudState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every later call of `operation` fail with `message`
    pub fn fail(&self, operation: CloudOperation, message: impl Into<String>) {
        self.lock().failures.insert(operation, message.into());
    }

    fn check(&self, operation: CloudOperation) -> Result<()> {
        match self.lock().failures.get(&operation) {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }

    pub fn create_organization(&self, name: &str) -> Result<Organization> {
        if let Some(problem) = organization_name_problem(name) {
            bail!(problem);
        }
        let mut state = self.lock();
        let exists = state
            .spec
            .organizations
            .iter()
            .any(|o| o.name.eq_ignore_ascii_case(name))
            || state
                .spec
                .taken_organization_names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(name));
        if exists {
            bail!("Organization '{}' already exists", name);
        }

        state.spec.organizations.push(OrganizationSpec {
            name: name.to_string(),
            projects: Vec::new(),
        });
        debug!(organization = name, "Created organization");
        Ok(Organization {
            id: organization_id(name),
            name: name.to_string(),
        })
    }

    /// Returns the existing project when one with the same name is present
    pub fn create_project(&self, organization: &str, name: &str) -> Result<Project> {
        let mut state = self.lock();
        let org = state
            .spec
            .organizations
            .iter_mut()
            .find(|o| o.name.eq_ignore_ascii_case(organization))
            .ok_or_else(|| anyhow!("Organization '{}' not found", organization))?;

        if let Some(existing) = org
            .projects
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
        {
            return Ok(to_project(&org.name, existing));
        }

        let project = ProjectSpec {
            name: name.to_string(),
            repositories: Vec::new(),
        };
        let created = to_project(&org.name, &project);
        org.projects.push(project);
        debug!(organization, project = name, "Created project");
        Ok(created)
    }

    pub fn create_service_connection(
        &self,
        scope: &str,
        name: &str,
        resource: &AzureResource,
    ) -> Result<ServiceConnection> {
        let mut state = self.lock();
        if state
            .service_connections
            .iter()
            .any(|c| c.scope == scope && c.name == name)
        {
            bail!("Service connection '{}' already exists in {}", name, scope);
        }

        let connection = ServiceConnection {
            id: format!("sc-{}", state.service_connections.len() + 1),
            name: name.to_string(),
            scope: scope.to_string(),
            resource_id: resource.id.clone(),
        };
        state.service_connections.push(connection.clone());
        debug!(scope, name, "Created service connection");
        Ok(connection)
    }

    pub fn queue_run(&self, request: RunRequest) -> QueuedRun {
        let mut state = self.lock();
        let id = state.runs.len() as u64 + 1;
        let url = match request.service {
            PipelineService::AzurePipelines => format!(
                "https://dev.azure.com/{}/_build/results?buildId={}",
                request.scope, id
            ),
            PipelineService::GitHubActions => {
                format!("https://github.com/{}/actions/runs/{}", request.scope, id)
            }
        };
        let run = QueuedRun {
            id,
            service: request.service,
            scope: request.scope,
            pipeline_name: request.pipeline_name,
            file: request.file,
            commit_id: request.commit_id,
            url,
        };
        state.runs.push(run.clone());
        debug!(id, url = %run.url, "Queued pipeline run");
        run
    }

    pub fn link_deployment(&self, resource: &AzureResource, pipeline: &str) {
        self.lock().deployments.push(DeploymentLink {
            resource_id: resource.id.clone(),
            pipeline: pipeline.to_string(),
        });
        debug!(resource = %resource.name, pipeline, "Linked deployment target");
    }

    pub fn deployment_links(&self) -> Vec<DeploymentLink> {
        self.lock().deployments.clone()
    }

    pub fn service_connections(&self) -> Vec<ServiceConnection> {
        self.lock().service_connections.clone()
    }

    pub fn queued_runs(&self) -> Vec<QueuedRun> {
        self.lock().runs.clone()
    }

    pub fn organization_names(&self) -> Vec<String> {
        self.lock()
            .spec
            .organizations
            .iter()
            .map(|o| o.name.clone())
            .collect()
    }
}

#[async_trait]
impl SessionProvider for InMemoryCloud {
    async fn wait_for_login(&self) -> Result<bool> {
        Ok(self.lock().spec.signed_in)
    }

    async fn current_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.check(CloudOperation::Subscriptions)?;
        let state = self.lock();
        Ok(state
            .spec
            .subscriptions
            .iter()
            .map(|s| s.to_subscription(&state.spec.tenant_id))
            .collect())
    }

    async fn session_for(&self, subscription_id: &str) -> Result<AzureSession> {
        let state = self.lock();
        let subscription = state
            .spec
            .subscriptions
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(subscription_id))
            .ok_or_else(|| anyhow!("Subscription '{}' not found", subscription_id))?;

        Ok(AzureSession {
            subscription_id: subscription.id.clone(),
            credentials: SessionCredentials::new(format!("offline:{}", subscription.id)),
            tenant_id: state.spec.tenant_id.clone(),
            endpoint: MANAGEMENT_ENDPOINT.to_string(),
            user_id: state.spec.user.clone(),
        })
    }
}

#[async_trait]
impl TargetResourceClient for InMemoryCloud {
    async fn resolve(&self, handle: &str) -> Result<AzureResource> {
        let state = self.lock();
        state
            .spec
            .subscriptions
            .iter()
            .flat_map(|s| s.resources.iter().map(move |r| r.to_resource(&s.id)))
            .find(|r| r.id.eq_ignore_ascii_case(handle.trim()))
            .ok_or_else(|| anyhow!("Resource '{}' not found", handle))
    }

    async fn validate_type(&self, resource: &AzureResource) -> Result<()> {
        if resource.target_kind().is_none() {
            bail!(
                "Resource '{}' of kind '{}' cannot be a pipeline target",
                resource.name,
                resource.kind
            );
        }
        Ok(())
    }

    async fn list(&self, session: &AzureSession, kind: TargetKind) -> Result<Vec<AzureResource>> {
        self.check(CloudOperation::Resources)?;
        let state = self.lock();
        let subscription = state
            .spec
            .subscriptions
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(&session.subscription_id))
            .ok_or_else(|| anyhow!("Subscription '{}' not found", session.subscription_id))?;

        Ok(subscription
            .resources
            .iter()
            .map(|r| r.to_resource(&subscription.id))
            .filter(|r| r.target_kind() == Some(kind))
            .collect())
    }
}

#[async_trait]
impl RemoteProjectClient for InMemoryCloud {
    async fn organizations(&self, _session: Option<&AzureSession>) -> Result<Vec<Organization>> {
        self.check(CloudOperation::Organizations)?;
        Ok(self
            .lock()
            .spec
            .organizations
            .iter()
            .map(|o| Organization {
                id: organization_id(&o.name),
                name: o.name.clone(),
            })
            .collect())
    }

    async fn projects(&self, organization: &str) -> Result<Vec<Project>> {
        self.check(CloudOperation::Projects)?;
        let state = self.lock();
        let org = state
            .spec
            .organizations
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(organization))
            .ok_or_else(|| anyhow!("Organization '{}' not found", organization))?;
        Ok(org.projects.iter().map(|p| to_project(&org.name, p)).collect())
    }

    async fn repository(
        &self,
        organization: &str,
        project: &str,
        repository: &str,
    ) -> Result<RemoteRepository> {
        self.check(CloudOperation::Repository)?;
        let state = self.lock();
        let org = state
            .spec
            .organizations
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(organization))
            .ok_or_else(|| anyhow!("Organization '{}' not found", organization))?;
        let proj = org
            .projects
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(project))
            .ok_or_else(|| anyhow!("Project '{}' not found in '{}'", project, org.name))?;
        let name = proj
            .repositories
            .iter()
            .find(|r| r.eq_ignore_ascii_case(repository))
            .ok_or_else(|| {
                anyhow!(
                    "Repository '{}' not found in '{}/{}'",
                    repository,
                    org.name,
                    proj.name
                )
            })?;

        Ok(RemoteRepository {
            id: repository_id(&org.name, &proj.name, name),
            name: name.clone(),
            project: to_project(&org.name, proj),
        })
    }

    async fn validate_organization_name(&self, name: &str) -> Result<Option<String>> {
        if let Some(problem) = organization_name_problem(name) {
            return Ok(Some(problem));
        }
        let state = self.lock();
        let taken = state
            .spec
            .organizations
            .iter()
            .map(|o| &o.name)
            .chain(state.spec.taken_organization_names.iter())
            .any(|n| n.eq_ignore_ascii_case(name));
        if taken {
            return Ok(Some(format!("Organization name '{}' is already taken", name)));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::environment::{ResourceSpec, SubscriptionSpec};

    fn cloud() -> InMemoryCloud {
        let mut spec = EnvironmentSpec::empty("jane.doe@contoso.com");
        spec.subscriptions.push(SubscriptionSpec {
            id: "sub-1".to_string(),
            name: "Production".to_string(),
            resources: vec![
                ResourceSpec {
                    name: "shop".to_string(),
                    kind: "app,linux".to_string(),
                    resource_group: "rg-web".to_string(),
                    location: "westeurope".to_string(),
                },
                ResourceSpec {
                    name: "legacy".to_string(),
                    kind: "app".to_string(),
                    resource_group: "rg-web".to_string(),
                    location: String::new(),
                },
            ],
        });
        spec.organizations.push(OrganizationSpec {
            name: "contoso".to_string(),
            projects: vec![ProjectSpec {
                name: "Web".to_string(),
                repositories: vec!["shop".to_string()],
            }],
        });
        spec.taken_organization_names.push("fabrikam".to_string());
        InMemoryCloud::new(spec)
    }

    #[tokio::test]
    async fn test_session_and_listing() {
        let cloud = cloud();
        let session = cloud.session_for("sub-1").await.unwrap();
        assert_eq!(session.user_local_part(), "jane.doe");

        let linux = cloud.list(&session, TargetKind::LinuxApp).await.unwrap();
        assert_eq!(linux.len(), 1);
        assert_eq!(linux[0].name, "shop");

        let resolved = cloud.resolve(&linux[0].id).await.unwrap();
        assert_eq!(resolved, linux[0]);
        assert!(cloud.session_for("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_repository_lookup_is_case_insensitive() {
        let cloud = cloud();
        let repo = cloud.repository("Contoso", "web", "SHOP").await.unwrap();
        assert_eq!(repo.name, "shop");
        assert_eq!(repo.project.name, "Web");
        assert!(cloud.repository("contoso", "Web", "other").await.is_err());
    }

    #[tokio::test]
    async fn test_validate_organization_name() {
        let cloud = cloud();
        assert_eq!(cloud.validate_organization_name("newco").await.unwrap(), None);
        assert!(cloud
            .validate_organization_name("fabrikam")
            .await
            .unwrap()
            .is_some());
        assert!(cloud
            .validate_organization_name("-bad")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let cloud = cloud();
        cloud.fail(CloudOperation::Organizations, "service unavailable");
        let err = cloud.organizations(None).await.unwrap_err();
        assert_eq!(err.to_string(), "service unavailable");
    }

    #[tokio::test]
    async fn test_provisioning_records() {
        let cloud = cloud();
        cloud.create_organization("newco").unwrap();
        let project = cloud.create_project("newco", "AzurePipelines").unwrap();
        let again = cloud.create_project("newco", "azurepipelines").unwrap();
        assert_eq!(project, again);
        assert!(cloud.create_organization("newco").is_err());

        let run = cloud.queue_run(RunRequest {
            service: PipelineService::GitHubActions,
            scope: "octo/shop".to_string(),
            pipeline_name: "shop".to_string(),
            file: PathBuf::from(".github/workflows/shop.yml"),
            commit_id: "abc".to_string(),
        });
        assert_eq!(run.url, "https://github.com/octo/shop/actions/runs/1");
        assert_eq!(cloud.queued_runs().len(), 1);
    }
}
