//! Workspace, branch and remote discovery

use super::choose::{choose, ready};
use super::context::WizardContext;
use super::error::WizardError;
use super::step::WizardStep;
use crate::git::{classify, ClassifyError};
use crate::model::{GitRepositoryParameters, WizardInputs};
use crate::prompt::{ChoiceItem, ChoiceRequest};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

const STEP: WizardStep = WizardStep::ResolveRepository;

/// What the caller already knows when the wizard starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardRequest {
    /// Open workspace folders, in display order
    pub workspace_folders: Vec<PathBuf>,
    /// Resource id of a deployment target picked before the wizard started
    pub target_handle: Option<String>,
    /// Remote used without prompting when the branch tracks none
    pub preferred_remote: Option<String>,
}

impl WizardRequest {
    pub fn new(workspace_folders: Vec<PathBuf>) -> Self {
        Self {
            workspace_folders,
            target_handle: None,
            preferred_remote: None,
        }
    }

    pub fn with_target(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    pub fn with_preferred_remote(mut self, remote: impl Into<String>) -> Self {
        self.preferred_remote = Some(remote.into());
        self
    }
}

/// Fills `source_repository`, `pipeline_parameters.working_directory` and, in
/// the target-first flow, `target_resource` and `azure_session`. Returns a copy
/// of the resolved repository.
pub(crate) async fn resolve_repository_context(
    ctx: &WizardContext,
    request: &WizardRequest,
    inputs: &mut WizardInputs,
) -> Result<GitRepositoryParameters, WizardError> {
    let workspace = match &request.target_handle {
        Some(handle) => {
            resolve_target_handle(ctx, handle, inputs).await?;
            match request.workspace_folders.first() {
                Some(folder) => folder.clone(),
                None => std::env::current_dir().map_err(|_| WizardError::NoWorkspaceSelected)?,
            }
        }
        None => select_workspace(ctx, &request.workspace_folders).await?,
    };
    info!(workspace = %workspace.display(), "Resolved workspace folder");

    let details = ctx
        .git
        .branch_details(&workspace)
        .await
        .map_err(WizardError::remote(STEP, "Read branch details"))?;
    let branch = details
        .branch
        .ok_or_else(|| WizardError::NoBranchCheckedOut(workspace.clone()))?;

    let remote_name = match details.remote_name {
        Some(remote) => remote,
        None => select_remote(ctx, &workspace, request.preferred_remote.as_deref()).await?,
    };

    let remote_url = ctx
        .git
        .remote_url(&workspace, &remote_name)
        .await
        .map_err(WizardError::remote(STEP, "Read remote URL"))?;
    let identity = classify(remote_url.as_deref()).map_err(|err| match err {
        ClassifyError::MissingUrl => WizardError::RemoteNotConfigured(remote_name.clone()),
        ClassifyError::Unrecognized(url) => WizardError::UnrecognizedRepositoryHost(url),
    })?;

    let root_path = ctx
        .git
        .root_directory(&workspace)
        .await
        .map_err(WizardError::remote(STEP, "Find repository root"))?;
    let working_directory = relative_working_directory(&root_path, &workspace);

    debug!(
        provider = %identity.provider(),
        repository = %identity.repository_id(),
        branch = %branch,
        remote = %remote_name,
        working_directory = %working_directory,
        "Resolved repository context"
    );
    ctx.telemetry
        .record_fact("repositoryProvider", identity.provider().name());

    inputs.pipeline_parameters.working_directory = working_directory.clone();
    let repository = GitRepositoryParameters {
        provider: identity.provider(),
        repository_id: identity.repository_id(),
        repository_name: identity.repository_name().to_string(),
        identity,
        remote_name,
        remote_url: remote_url.unwrap_or_default(),
        branch,
        commit_id: String::new(),
        local_path: workspace,
        root_path,
        working_directory,
    };
    inputs.source_repository = Some(repository.clone());
    Ok(repository)
}

async fn resolve_target_handle(
    ctx: &WizardContext,
    handle: &str,
    inputs: &mut WizardInputs,
) -> Result<(), WizardError> {
    let resource = ctx
        .targets
        .resolve(handle)
        .await
        .map_err(WizardError::remote(STEP, "Resolve deployment target"))?;
    ctx.targets
        .validate_type(&resource)
        .await
        .map_err(|err| WizardError::UnsupportedTarget {
            resource: resource.name.clone(),
            reason: format!("{:#}", err),
        })?;

    let subscription_id = resource
        .subscription_id()
        .map(str::to_string)
        .ok_or_else(|| WizardError::UnsupportedTarget {
            resource: resource.name.clone(),
            reason: "the resource id names no subscription".to_string(),
        })?;
    let session = ctx
        .sessions
        .session_for(&subscription_id)
        .await
        .map_err(WizardError::remote(STEP, "Open subscription session"))?;

    info!(resource = %resource.name, subscription = %subscription_id, "Using preselected deployment target");
    ctx.telemetry.record_fact("targetFirst", "true");
    inputs.target_resource.subscription_id = Some(subscription_id);
    inputs.target_resource.resource = Some(resource);
    inputs.azure_session = Some(session);
    Ok(())
}

fn folder_label(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string())
}

async fn select_workspace(ctx: &WizardContext, folders: &[PathBuf]) -> Result<PathBuf, WizardError> {
    match folders {
        [] => ctx
            .prompt
            .browse_folder("Select the folder of the repository to configure")
            .await
            .map_err(WizardError::remote(STEP, "Browse for folder"))?
            .ok_or(WizardError::NoWorkspaceSelected),
        [only] => Ok(only.clone()),
        many => {
            let options = many
                .iter()
                .map(|folder| {
                    let item = ChoiceItem::new(folder_label(folder))
                        .with_description(folder.display().to_string());
                    (item, folder.clone())
                })
                .collect();
            choose(
                ctx.prompt.as_ref(),
                &ChoiceRequest::new("Select workspace folder", "Folder containing the repository"),
                STEP,
                "List workspace folders",
                ready(options),
                || WizardError::NoWorkspaceSelected,
            )
            .await
        }
    }
}

async fn select_remote(
    ctx: &WizardContext,
    workspace: &Path,
    preferred: Option<&str>,
) -> Result<String, WizardError> {
    let remotes = ctx
        .git
        .remotes(workspace)
        .await
        .map_err(WizardError::remote(STEP, "List remotes"))?;

    if let Some(preferred) = preferred {
        if remotes.iter().any(|r| r.name == preferred) {
            debug!(remote = %preferred, "Using preferred remote");
            return Ok(preferred.to_string());
        }
    }

    match remotes.as_slice() {
        [] => Err(WizardError::NoRemoteConfigured(workspace.to_path_buf())),
        [only] => Ok(only.name.clone()),
        many => {
            let options = many
                .iter()
                .map(|r| (ChoiceItem::new(r.name.clone()), r.name.clone()))
                .collect();
            choose(
                ctx.prompt.as_ref(),
                &ChoiceRequest::new("Select the remote to push to", "Git remote"),
                STEP,
                "List remotes",
                ready(options),
                || WizardError::NoRemoteConfigured(workspace.to_path_buf()),
            )
            .await
        }
    }
}

/// `workspace` relative to `root`, `/`-separated; `.` when they are the same folder
pub fn relative_working_directory(root: &Path, workspace: &Path) -> String {
    let relative = workspace.strip_prefix(root).map(Path::to_path_buf).or_else(|_| {
        let root = root.canonicalize()?;
        let workspace = workspace.canonicalize()?;
        workspace
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    });

    let parts: Vec<String> = match relative {
        Ok(relative) => relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
