//! Repository hosting providers and pipeline services

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote hosting system that owns a git remote URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryProvider {
    /// Repository hosted inside an Azure DevOps organization
    AzureRepos,
    /// Repository hosted on GitHub
    #[serde(rename = "github")]
    GitHub,
}

impl RepositoryProvider {
    pub fn name(&self) -> &'static str {
        match self {
            RepositoryProvider::AzureRepos => "Azure Repos",
            RepositoryProvider::GitHub => "GitHub",
        }
    }
}

impl fmt::Display for RepositoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity parsed out of a remote URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "provider", rename_all = "kebab-case")]
pub enum RepositoryIdentity {
    AzureRepos {
        organization: String,
        project: String,
        repository: String,
    },
    #[serde(rename = "github")]
    GitHub {
        owner: String,
        repository: String,
    },
}

impl RepositoryIdentity {
    pub fn provider(&self) -> RepositoryProvider {
        match self {
            RepositoryIdentity::AzureRepos { .. } => RepositoryProvider::AzureRepos,
            RepositoryIdentity::GitHub { .. } => RepositoryProvider::GitHub,
        }
    }

    pub fn repository_name(&self) -> &str {
        match self {
            RepositoryIdentity::AzureRepos { repository, .. } => repository,
            RepositoryIdentity::GitHub { repository, .. } => repository,
        }
    }

    /// Provider-scoped repository id: `owner/repo` or `organization/project/repo`
    pub fn repository_id(&self) -> String {
        match self {
            RepositoryIdentity::AzureRepos {
                organization,
                project,
                repository,
            } => format!("{}/{}/{}", organization, project, repository),
            RepositoryIdentity::GitHub { owner, repository } => {
                format!("{}/{}", owner, repository)
            }
        }
    }
}

/// Service that executes the generated pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineService {
    AzurePipelines,
    #[serde(rename = "github-actions")]
    GitHubActions,
}

impl PipelineService {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineService::AzurePipelines => "Azure Pipelines",
            PipelineService::GitHubActions => "GitHub Actions",
        }
    }

    pub fn from_str_loose(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "azure-pipelines" | "azure" | "azdo" => Some(PipelineService::AzurePipelines),
            "github-actions" | "actions" | "github" => Some(PipelineService::GitHubActions),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_repository_id() {
        let azure = RepositoryIdentity::AzureRepos {
            organization: "contoso".to_string(),
            project: "web".to_string(),
            repository: "shop".to_string(),
        };
        assert_eq!(azure.repository_id(), "contoso/web/shop");
        assert_eq!(azure.provider(), RepositoryProvider::AzureRepos);

        let github = RepositoryIdentity::GitHub {
            owner: "octo".to_string(),
            repository: "hello".to_string(),
        };
        assert_eq!(github.repository_id(), "octo/hello");
        assert_eq!(github.repository_name(), "hello");
    }

    #[test]
    fn test_service_from_str_loose() {
        assert_eq!(
            PipelineService::from_str_loose("Azure Pipelines"),
            Some(PipelineService::AzurePipelines)
        );
        assert_eq!(
            PipelineService::from_str_loose("github_actions"),
            Some(PipelineService::GitHubActions)
        );
        assert_eq!(PipelineService::from_str_loose("jenkins"), None);
    }
}
