//! YAML description of an offline cloud account
//!
//! ```yaml
//! user: jane.doe@contoso.com
//! tenant_id: 72f988bf
//! subscriptions:
//!   - id: sub-1
//!     name: Production
//!     resources:
//!       - name: shop
//!         kind: app,linux
//!         resource_group: rg-web
//! organizations:
//!   - name: contoso
//!     projects:
//!       - name: Web
//!         repositories: [shop]
//! ```

use crate::model::{AzureResource, Subscription};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("Failed to read environment file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse environment file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid environment: {0}")]
    Invalid(String),
}

fn default_signed_in() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub user: String,
    #[serde(default = "default_signed_in")]
    pub signed_in: bool,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionSpec>,
    #[serde(default)]
    pub organizations: Vec<OrganizationSpec>,
    /// Organization names owned by other accounts
    #[serde(default)]
    pub taken_organization_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_resource_group")]
    pub resource_group: String,
    #[serde(default)]
    pub location: String,
}

fn default_kind() -> String {
    "app".to_string()
}

fn default_resource_group() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSpec {
    pub name: String,
    #[serde(default)]
    pub projects: Vec<ProjectSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub name: String,
    #[serde(default)]
    pub repositories: Vec<String>,
}

impl EnvironmentSpec {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, EnvironmentError> {
        let content = std::fs::read_to_string(path).map_err(|source| EnvironmentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = Self::from_yaml(&content).map_err(|source| EnvironmentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        spec.validate()?;
        Ok(spec)
    }

    /// Signed-in account with nothing in it
    pub fn empty(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            signed_in: true,
            tenant_id: String::new(),
            subscriptions: Vec::new(),
            organizations: Vec::new(),
            taken_organization_names: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), EnvironmentError> {
        if self.user.trim().is_empty() {
            return Err(EnvironmentError::Invalid("user cannot be empty".to_string()));
        }

        let mut subscription_ids = HashSet::new();
        for subscription in &self.subscriptions {
            if !subscription_ids.insert(subscription.id.to_lowercase()) {
                return Err(EnvironmentError::Invalid(format!(
                    "duplicate subscription id '{}'",
                    subscription.id
                )));
            }
        }

        let mut organization_names = HashSet::new();
        for organization in &self.organizations {
            if !organization_names.insert(organization.name.to_lowercase()) {
                return Err(EnvironmentError::Invalid(format!(
                    "duplicate organization '{}'",
                    organization.name
                )));
            }
        }
        Ok(())
    }
}

impl SubscriptionSpec {
    pub fn to_subscription(&self, tenant_id: &str) -> Subscription {
        Subscription {
            id: self.id.clone(),
            name: self.name.clone(),
            tenant_id: tenant_id.to_string(),
        }
    }
}

impl ResourceSpec {
    pub fn to_resource(&self, subscription_id: &str) -> AzureResource {
        AzureResource {
            id: format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Web/sites/{}",
                subscription_id, self.resource_group, self.name
            ),
            name: self.name.clone(),
            kind: self.kind.clone(),
            location: self.location.clone(),
        }
    }
}
