use crate::model::{AzureResource, AzureSession, Subscription, TargetKind};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Signed-in account and the subscriptions it can see
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves once sign-in has settled; `false` when no account is available
    async fn wait_for_login(&self) -> Result<bool>;

    async fn current_subscriptions(&self) -> Result<Vec<Subscription>>;

    async fn session_for(&self, subscription_id: &str) -> Result<AzureSession>;
}

/// Deployment-target lookups
#[async_trait]
pub trait TargetResourceClient: Send + Sync {
    /// Resolves a caller-supplied handle (a resource id) to a resource
    async fn resolve(&self, handle: &str) -> Result<AzureResource>;

    /// Fails when the resource cannot be a pipeline target
    async fn validate_type(&self, resource: &AzureResource) -> Result<()>;

    async fn list(&self, session: &AzureSession, kind: TargetKind) -> Result<Vec<AzureResource>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: String,
    pub name: String,
    pub project: Project,
}

/// Organization/project container lookups for Azure Pipelines
#[async_trait]
pub trait RemoteProjectClient: Send + Sync {
    async fn organizations(&self, session: Option<&AzureSession>) -> Result<Vec<Organization>>;

    async fn projects(&self, organization: &str) -> Result<Vec<Project>>;

    async fn repository(
        &self,
        organization: &str,
        project: &str,
        repository: &str,
    ) -> Result<RemoteRepository>;

    /// `Some(message)` when the name is rejected
    async fn validate_organization_name(&self, name: &str) -> Result<Option<String>>;
}
