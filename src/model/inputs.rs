//! The mutable aggregate threaded through every wizard stage
//!
//! Field ownership per stage:
//!
//! | Field | Written by |
//! |-------|-----------|
//! | `source_repository` | repository context resolution (commit id: check-in) |
//! | `target_resource` | repository context (target-first flow) or target resolution |
//! | `azure_session` | whichever stage fixes the subscription |
//! | `pipeline_parameters.template` | template selection |
//! | `pipeline_parameters.pipeline_file_name` | check-in |
//! | `pipeline_parameters.working_directory` | repository context resolution |
//! | `pipeline_parameters.service_connection` | provisioner prerequisites |
//! | `organization_name`, `project`, `is_new_organization`, `remote_repository_id` | remote project resolution |

use super::provider::{RepositoryIdentity, RepositoryProvider};
use super::resource::{AzureResource, AzureSession};
use super::template::PipelineTemplate;
use std::path::PathBuf;

/// Facts about the local repository and the remote it pushes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepositoryParameters {
    pub provider: RepositoryProvider,
    pub identity: RepositoryIdentity,
    pub repository_id: String,
    pub repository_name: String,
    pub remote_name: String,
    pub remote_url: String,
    pub branch: String,
    /// Empty until the generated pipeline has been committed and pushed
    pub commit_id: String,
    /// Folder the wizard was started on
    pub local_path: PathBuf,
    /// Git working tree root
    pub root_path: PathBuf,
    /// `local_path` relative to `root_path`, `/`-separated, `.` at the root
    pub working_directory: String,
}

impl GitRepositoryParameters {
    pub fn is_committed(&self) -> bool {
        !self.commit_id.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetResource {
    pub subscription_id: Option<String>,
    pub resource: Option<AzureResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineParameters {
    pub template: Option<PipelineTemplate>,
    /// Repository-relative path of the written pipeline file
    pub pipeline_file_name: Option<PathBuf>,
    pub working_directory: String,
    pub service_connection: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProject {
    pub id: String,
    pub name: String,
}

/// Everything the wizard learns during one run
#[derive(Debug, Clone, Default)]
pub struct WizardInputs {
    pub source_repository: Option<GitRepositoryParameters>,
    pub target_resource: TargetResource,
    pub pipeline_parameters: PipelineParameters,
    pub organization_name: Option<String>,
    pub project: Option<RemoteProject>,
    pub is_new_organization: bool,
    pub remote_repository_id: Option<String>,
    pub azure_session: Option<AzureSession>,
}

impl WizardInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_target_resource(&self) -> bool {
        self.target_resource.resource.is_some()
    }

    pub fn commit_id(&self) -> Option<&str> {
        self.source_repository
            .as_ref()
            .map(|repo| repo.commit_id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Flat key/value view used by template rendering
    pub fn template_variables(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();

        if let Some(repo) = &self.source_repository {
            vars.push(("repositoryName", repo.repository_name.clone()));
            vars.push(("repositoryId", repo.repository_id.clone()));
            vars.push(("branch", repo.branch.clone()));
            vars.push(("remoteUrl", repo.remote_url.clone()));
        }
        vars.push((
            "workingDirectory",
            self.pipeline_parameters.working_directory.clone(),
        ));
        if let Some(subscription_id) = &self.target_resource.subscription_id {
            vars.push(("subscriptionId", subscription_id.clone()));
        }
        if let Some(resource) = &self.target_resource.resource {
            vars.push(("resourceName", resource.name.clone()));
            vars.push(("resourceId", resource.id.clone()));
            vars.push(("resourceKind", resource.kind.clone()));
        }
        if let Some(connection) = &self.pipeline_parameters.service_connection {
            vars.push(("serviceConnection", connection.clone()));
        }
        if let Some(organization) = &self.organization_name {
            vars.push(("organizationName", organization.clone()));
        }
        if let Some(project) = &self.project {
            vars.push(("projectName", project.name.clone()));
        }
        vars
    }
}
