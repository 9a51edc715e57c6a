use super::step::WizardStep;
use crate::model::TargetKind;
use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a [`WizardError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dismissed prompt or discarded pipeline; not a failure
    Cancelled,
    /// Bad user input that is normally re-asked
    Validation,
    /// Missing local or account setup; the run cannot continue
    NotConfigured,
    /// A collaborator call failed
    RemoteCall,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Pipeline configuration was canceled")]
    UserCancelled,

    #[error("Invalid organization name '{name}': {reason}")]
    InvalidOrganizationName { name: String, reason: String },

    #[error("Not signed in to Azure")]
    NotSignedIn,

    #[error("No folder was selected")]
    NoWorkspaceSelected,

    #[error("No branch is checked out in {0}")]
    NoBranchCheckedOut(PathBuf),

    #[error("The repository at {0} has no git remote")]
    NoRemoteConfigured(PathBuf),

    #[error("Remote '{0}' has no URL")]
    RemoteNotConfigured(String),

    #[error("Remote URL '{0}' is not hosted on Azure Repos or GitHub")]
    UnrecognizedRepositoryHost(String),

    #[error("No pipeline template fits this repository")]
    NoApplicableTemplate,

    #[error("No Azure subscriptions are available to this account")]
    NoSubscriptions,

    #[error("No '{kind}' resources found in subscription {subscription}")]
    NoTargetResources {
        kind: TargetKind,
        subscription: String,
    },

    #[error("Resource '{resource}' cannot be a pipeline target: {reason}")]
    UnsupportedTarget { resource: String, reason: String },

    #[error("{operation} failed during {step}: {source}")]
    RemoteCall {
        step: WizardStep,
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl WizardError {
    /// Adapter for `map_err` on collaborator results
    pub fn remote(
        step: WizardStep,
        operation: &'static str,
    ) -> impl FnOnce(anyhow::Error) -> WizardError {
        move |source| WizardError::RemoteCall {
            step,
            operation,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WizardError::UserCancelled => ErrorKind::Cancelled,
            WizardError::InvalidOrganizationName { .. } => ErrorKind::Validation,
            WizardError::RemoteCall { .. } => ErrorKind::RemoteCall,
            WizardError::NotSignedIn
            | WizardError::NoWorkspaceSelected
            | WizardError::NoBranchCheckedOut(_)
            | WizardError::NoRemoteConfigured(_)
            | WizardError::RemoteNotConfigured(_)
            | WizardError::UnrecognizedRepositoryHost(_)
            | WizardError::NoApplicableTemplate
            | WizardError::NoSubscriptions
            | WizardError::NoTargetResources { .. }
            | WizardError::UnsupportedTarget { .. } => ErrorKind::NotConfigured,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }

    /// Process exit status: 130 for a cancelled run, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_cancelled() {
            130
        } else {
            1
        }
    }

    /// Returns a user-friendly error message with troubleshooting hints
    pub fn help_message(&self) -> String {
        match self {
            WizardError::UserCancelled => "Pipeline configuration was canceled.".to_string(),
            WizardError::InvalidOrganizationName { name, reason } => format!(
                "Error: Invalid organization name '{}'\n\n\
                Help: {}\n\
                Organization names use 1-50 letters, digits and hyphens and\n\
                must start and end with a letter or digit.",
                name, reason
            ),
            WizardError::NotSignedIn => "Error: Not signed in to Azure\n\n\
                Help: Describe the signed-in account in the environment file\n\
                (--environment or PIPEWRIGHT_ENVIRONMENT) and set `signed_in: true`."
                .to_string(),
            WizardError::NoWorkspaceSelected => "Error: No folder was selected\n\n\
                Help: Pass the repository folder as an argument:\n\
                pipewright configure path/to/repo"
                .to_string(),
            WizardError::NoBranchCheckedOut(path) => format!(
                "Error: No branch is checked out\nPath: {}\n\n\
                Help: The repository is in detached HEAD state or has no commits.\n\
                Check out a branch first: git checkout -b main",
                path.display()
            ),
            WizardError::NoRemoteConfigured(path) => format!(
                "Error: The repository has no git remote\nPath: {}\n\n\
                Help: Push the repository to Azure Repos or GitHub first:\n\
                git remote add origin <url>\n\
                git push -u origin <branch>",
                path.display()
            ),
            WizardError::RemoteNotConfigured(remote) => format!(
                "Error: Remote '{}' has no URL\n\n\
                Help: Set one with: git remote set-url {} <url>",
                remote, remote
            ),
            WizardError::UnrecognizedRepositoryHost(url) => format!(
                "Error: Unsupported repository host\nURL: {}\n\n\
                Help: Only repositories hosted on Azure Repos\n\
                (dev.azure.com, *.visualstudio.com) or GitHub (github.com) are supported.",
                url
            ),
            WizardError::NoApplicableTemplate => "Error: No pipeline template fits this repository\n\n\
                Help: List the templates the catalog offers with: pipewright templates <path>\n\
                Use --templates to point at a directory with your own templates.yaml."
                .to_string(),
            WizardError::NoSubscriptions => "Error: No Azure subscriptions found\n\n\
                Help: Add a subscription to the environment file under `subscriptions:`."
                .to_string(),
            WizardError::NoTargetResources { kind, subscription } => format!(
                "Error: No '{}' resources found in subscription {}\n\n\
                Help: Create a matching web app first, or choose a build-only template.",
                kind, subscription
            ),
            WizardError::UnsupportedTarget { resource, reason } => format!(
                "Error: Resource '{}' cannot be a pipeline target\n\n\
                Help: {}\n\
                Supported kinds: app, app,linux, app,linux,container, functionapp, functionapp,linux.",
                resource, reason
            ),
            WizardError::RemoteCall {
                step,
                operation,
                source,
            } => format!(
                "Error: {} failed during {}\n\nDetails: {:#}",
                operation, step, source
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_kinds() {
        assert_eq!(WizardError::UserCancelled.kind(), ErrorKind::Cancelled);
        assert!(WizardError::UserCancelled.is_cancelled());
        assert_eq!(WizardError::UserCancelled.exit_code(), 130);
        assert_eq!(WizardError::NotSignedIn.exit_code(), 1);
        assert_eq!(
            WizardError::NoRemoteConfigured(PathBuf::from("/repo")).kind(),
            ErrorKind::NotConfigured
        );
        assert_eq!(
            WizardError::InvalidOrganizationName {
                name: "-x".to_string(),
                reason: "bad".to_string()
            }
            .kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_remote_call_keeps_source() {
        let err = WizardError::remote(WizardStep::ResolveTarget, "List resources")(anyhow!(
            "throttled"
        ));
        assert_eq!(err.kind(), ErrorKind::RemoteCall);
        assert_eq!(
            err.to_string(),
            "List resources failed during ResolveTarget: throttled"
        );
        assert!(err.help_message().contains("Details: throttled"));
    }

    #[test]
    fn test_help_messages_name_the_problem() {
        let err = WizardError::UnrecognizedRepositoryHost("https://gitlab.com/a/b".to_string());
        assert!(err.help_message().contains("gitlab.com"));
        assert!(WizardError::NoApplicableTemplate
            .help_message()
            .contains("pipewright templates"));
    }
}
