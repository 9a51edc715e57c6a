//! Data model shared by the wizard stages and their collaborators

pub mod inputs;
pub mod provider;
pub mod resource;
pub mod suffix;
pub mod template;

pub use inputs::{
    GitRepositoryParameters, PipelineParameters, RemoteProject, TargetResource, WizardInputs,
};
pub use provider::{PipelineService, RepositoryIdentity, RepositoryProvider};
pub use resource::{
    AzureResource, AzureSession, SessionCredentials, Subscription, TargetKind, TargetType,
};
pub use suffix::RunSuffix;
pub use template::{PipelineTemplate, ANY_LANGUAGE};
