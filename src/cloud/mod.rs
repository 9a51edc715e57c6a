//! Cloud-side collaborators: sessions, deployment targets and remote projects

mod client;
pub mod environment;
mod memory;
pub mod naming;

pub use client::{
    Organization, Project, RemoteProjectClient, RemoteRepository, SessionProvider,
    TargetResourceClient,
};
pub use environment::{EnvironmentError, EnvironmentSpec};
pub use memory::{
    CloudOperation, DeploymentLink, InMemoryCloud, QueuedRun, RunRequest, ServiceConnection,
};
pub use naming::{derive_organization_name, organization_name_problem};
