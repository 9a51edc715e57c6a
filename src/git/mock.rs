use super::context::{BranchDetails, GitContext, RemoteInfo};
use crate::model::GitRepositoryParameters;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory git repository with scripted push outcomes
pub struct MockGitContext {
    root: PathBuf,
    branch: Option<String>,
    tracked_remote: Option<String>,
    remotes: Vec<(String, Option<String>)>,
    push_results: Mutex<VecDeque<Result<String, String>>>,
    written: Mutex<Vec<(PathBuf, String)>>,
    push_attempts: Mutex<usize>,
}

impl MockGitContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            branch: Some("main".to_string()),
            tracked_remote: None,
            remotes: Vec::new(),
            push_results: Mutex::new(VecDeque::new()),
            written: Mutex::new(Vec::new()),
            push_attempts: Mutex::new(0),
        }
    }

    pub fn with_branch(mut self, branch: Option<&str>) -> Self {
        self.branch = branch.map(str::to_string);
        self
    }

    pub fn with_remote(mut self, name: &str, url: Option<&str>) -> Self {
        self.remotes
            .push((name.to_string(), url.map(str::to_string)));
        self
    }

    pub fn tracking(mut self, remote: &str) -> Self {
        self.tracked_remote = Some(remote.to_string());
        self
    }

    pub fn push_succeeds(&self, commit_id: impl Into<String>) {
        lock(&self.push_results).push_back(Ok(commit_id.into()));
    }

    pub fn push_fails(&self, message: impl Into<String>) {
        lock(&self.push_results).push_back(Err(message.into()));
    }

    pub fn written_files(&self) -> Vec<(PathBuf, String)> {
        lock(&self.written).clone()
    }

    pub fn push_attempts(&self) -> usize {
        *lock(&self.push_attempts)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl GitContext for MockGitContext {
    async fn branch_details(&self, _repo: &Path) -> Result<BranchDetails> {
        Ok(BranchDetails {
            branch: self.branch.clone(),
            remote_name: self.tracked_remote.clone(),
        })
    }

    async fn remotes(&self, _repo: &Path) -> Result<Vec<RemoteInfo>> {
        Ok(self
            .remotes
            .iter()
            .map(|(name, _)| RemoteInfo::new(name.clone()))
            .collect())
    }

    async fn remote_url(&self, _repo: &Path, remote: &str) -> Result<Option<String>> {
        self.remotes
            .iter()
            .find(|(name, _)| name == remote)
            .map(|(_, url)| url.clone())
            .ok_or_else(|| anyhow!("No such remote '{}'", remote))
    }

    async fn root_directory(&self, _repo: &Path) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    async fn add_file(
        &self,
        _root: &Path,
        content: &str,
        relative_path: &Path,
    ) -> Result<PathBuf> {
        lock(&self.written).push((relative_path.to_path_buf(), content.to_string()));
        Ok(relative_path.to_path_buf())
    }

    async fn commit_and_push(
        &self,
        _file: &Path,
        _repository: &GitRepositoryParameters,
    ) -> Result<String> {
        *lock(&self.push_attempts) += 1;
        match lock(&self.push_results).pop_front() {
            Some(Ok(commit)) => Ok(commit),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("MockGitContext: no push outcome scripted")),
        }
    }

    fn name(&self) -> &str {
        "mock-git"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remote_lookup() {
        let git = MockGitContext::new("/repo")
            .with_remote("origin", Some("https://github.com/octo/hello"))
            .with_remote("bare", None);

        let root = Path::new("/repo");
        assert_eq!(git.remotes(root).await.unwrap().len(), 2);
        assert_eq!(
            git.remote_url(root, "origin").await.unwrap().as_deref(),
            Some("https://github.com/octo/hello")
        );
        assert_eq!(git.remote_url(root, "bare").await.unwrap(), None);
        assert!(git.remote_url(root, "missing").await.is_err());
    }

    #[tokio::test]
    async fn test_branch_defaults() {
        let git = MockGitContext::new("/repo").tracking("origin");
        let details = git.branch_details(Path::new("/repo")).await.unwrap();
        assert_eq!(details.branch.as_deref(), Some("main"));
        assert_eq!(details.remote_name.as_deref(), Some("origin"));
    }
}
