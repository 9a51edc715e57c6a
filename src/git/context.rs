use crate::model::GitRepositoryParameters;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Checked-out branch and the remote it tracks, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchDetails {
    pub branch: Option<String>,
    pub remote_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub name: String,
}

impl RemoteInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Version-control plumbing consumed by the wizard
#[async_trait]
pub trait GitContext: Send + Sync {
    async fn branch_details(&self, repo: &Path) -> Result<BranchDetails>;

    async fn remotes(&self, repo: &Path) -> Result<Vec<RemoteInfo>>;

    /// `None` when the remote exists but has no URL
    async fn remote_url(&self, repo: &Path, remote: &str) -> Result<Option<String>>;

    /// Top level of the working tree containing `repo`
    async fn root_directory(&self, repo: &Path) -> Result<PathBuf>;

    /// Writes `content` under `root`, never overwriting an existing file.
    /// Returns the repository-relative path actually written.
    async fn add_file(&self, root: &Path, content: &str, relative_path: &Path)
        -> Result<PathBuf>;

    /// Commits `file` and pushes the branch; returns the new commit id.
    /// Fails when the push is rejected.
    async fn commit_and_push(
        &self,
        file: &Path,
        repository: &GitRepositoryParameters,
    ) -> Result<String>;

    fn name(&self) -> &str;
}
