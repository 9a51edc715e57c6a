//! `GitContext` backed by the `git` executable

use super::context::{BranchDetails, GitContext, RemoteInfo};
use crate::model::GitRepositoryParameters;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, info};

const DEFAULT_COMMIT_MESSAGE: &str = "Set up CI/CD pipeline";

pub struct GitCli {
    program: String,
    commit_message: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    async fn run(&self, repo: &Path, args: &[&str]) -> Result<Output> {
        debug!(repo = %repo.display(), args = ?args, "Running git");
        Command::new(&self.program)
            .arg("-C")
            .arg(repo)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to invoke {}", self.program))
    }

    /// Trimmed stdout on success, error carrying stderr otherwise
    async fn stdout(&self, repo: &Path, args: &[&str]) -> Result<String> {
        let output = self.run(repo, args).await?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(anyhow!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }

    /// Trimmed stdout on success, `None` on a non-zero exit
    async fn stdout_opt(&self, repo: &Path, args: &[&str]) -> Result<Option<String>> {
        let output = self.run(repo, args).await?;
        if output.status.success() {
            let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok(Some(text).filter(|t| !t.is_empty()))
        } else {
            Ok(None)
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitContext for GitCli {
    async fn branch_details(&self, repo: &Path) -> Result<BranchDetails> {
        let head = self
            .stdout_opt(repo, &["rev-parse", "--abbrev-ref", "HEAD"])
            .await?;
        let branch = head.filter(|h| h != "HEAD");

        let remote_name = match &branch {
            Some(name) => {
                let key = format!("branch.{}.remote", name);
                self.stdout_opt(repo, &["config", "--get", key.as_str()]).await?
            }
            None => None,
        };

        Ok(BranchDetails {
            branch,
            remote_name,
        })
    }

    async fn remotes(&self, repo: &Path) -> Result<Vec<RemoteInfo>> {
        let text = self.stdout(repo, &["remote"]).await?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(RemoteInfo::new)
            .collect())
    }

    async fn remote_url(&self, repo: &Path, remote: &str) -> Result<Option<String>> {
        let key = format!("remote.{}.url", remote);
        self.stdout_opt(repo, &["config", "--get", key.as_str()]).await
    }

    async fn root_directory(&self, repo: &Path) -> Result<PathBuf> {
        let top = self
            .stdout(repo, &["rev-parse", "--show-toplevel"])
            .await
            .with_context(|| format!("{} is not inside a git repository", repo.display()))?;
        Ok(PathBuf::from(top))
    }

    async fn add_file(
        &self,
        root: &Path,
        content: &str,
        relative_path: &Path,
    ) -> Result<PathBuf> {
        let relative = unique_relative_path(root, relative_path);
        let absolute = root.join(&relative);

        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&absolute, content)
            .await
            .with_context(|| format!("Failed to write {}", absolute.display()))?;

        info!(file = %relative.display(), "Pipeline file written");
        Ok(relative)
    }

    async fn commit_and_push(
        &self,
        file: &Path,
        repository: &GitRepositoryParameters,
    ) -> Result<String> {
        let root = repository.root_path.as_path();
        let file_arg = file.to_string_lossy();
        let file_arg: &str = file_arg.as_ref();

        // A previous attempt may have committed before its push was rejected.
        // Ignored files are clean in `status` too, so only skip when HEAD has it.
        let pending = self
            .stdout(root, &["status", "--porcelain", "--", file_arg])
            .await?;
        let at_head = format!("HEAD:{}", file_arg);
        let committed = pending.is_empty()
            && self
                .run(root, &["cat-file", "-e", at_head.as_str()])
                .await?
                .status
                .success();
        if !committed {
            self.stdout(root, &["add", "--", file_arg]).await?;
            self.stdout(
                root,
                &["commit", "-m", self.commit_message.as_str(), "--", file_arg],
            )
            .await?;
        }

        self.stdout(
            root,
            &[
                "push",
                repository.remote_name.as_str(),
                repository.branch.as_str(),
            ],
        )
        .await?;

        let commit = self.stdout(root, &["rev-parse", "HEAD"]).await?;
        info!(commit = %commit, "Pipeline committed and pushed");
        Ok(commit)
    }

    fn name(&self) -> &str {
        "git"
    }
}

/// `dir/name.yml`, then `dir/name-1.yml`, `dir/name-2.yml`, ... until unused
pub fn unique_relative_path(root: &Path, relative_path: &Path) -> PathBuf {
    if !root.join(relative_path).exists() {
        return relative_path.to_path_buf();
    }

    let stem = relative_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = relative_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = relative_path.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1;
    loop {
        let candidate = parent.join(format!("{}-{}{}", stem, counter, extension));
        if !root.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unique_path_unused() {
        let dir = TempDir::new().unwrap();
        let path = unique_relative_path(dir.path(), Path::new("azure-pipelines.yml"));
        assert_eq!(path, PathBuf::from("azure-pipelines.yml"));
    }

    #[test]
    fn test_unique_path_skips_existing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".github/workflows")).unwrap();
        fs::write(dir.path().join(".github/workflows/deploy.yml"), "a").unwrap();
        fs::write(dir.path().join(".github/workflows/deploy-1.yml"), "b").unwrap();

        let path = unique_relative_path(dir.path(), Path::new(".github/workflows/deploy.yml"));
        assert_eq!(path, PathBuf::from(".github/workflows/deploy-2.yml"));
    }

    #[tokio::test]
    async fn test_add_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let git = GitCli::new();

        let written = git
            .add_file(dir.path(), "name: ci\n", Path::new(".github/workflows/ci.yml"))
            .await
            .unwrap();

        assert_eq!(written, PathBuf::from(".github/workflows/ci.yml"));
        let content = fs::read_to_string(dir.path().join(&written)).unwrap();
        assert_eq!(content, "name: ci\n");
    }

    #[tokio::test]
    async fn test_add_file_never_overwrites() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("azure-pipelines.yml"), "original").unwrap();
        let git = GitCli::new();

        let written = git
            .add_file(dir.path(), "generated", Path::new("azure-pipelines.yml"))
            .await
            .unwrap();

        assert_eq!(written, PathBuf::from("azure-pipelines-1.yml"));
        assert_eq!(
            fs::read_to_string(dir.path().join("azure-pipelines.yml")).unwrap(),
            "original"
        );
    }
}
