//! The configure-pipeline wizard
//!
//! [`WizardOrchestrator`] drives one run through its [`WizardStep`]s. Each
//! stage resolves part of the [`WizardInputs`](crate::model::WizardInputs)
//! aggregate through the collaborators held by [`WizardContext`]:
//!
//! 1. repository context (workspace, branch, remote, provider)
//! 2. pipeline service and template
//! 3. subscription and deployment target, unless already known
//! 4. organization and project, for Azure Pipelines
//! 5. prerequisites, check-in, queueing and post steps

mod checkin;
mod choose;
mod context;
mod error;
mod orchestrator;
mod project;
mod repository;
mod step;
mod target;
mod template;

pub use context::WizardContext;
pub use error::{ErrorKind, WizardError};
pub use orchestrator::{WizardOrchestrator, WizardOutcome};
pub use project::{ensure_organization_name, NEW_ORGANIZATION_PROJECT};
pub use repository::{relative_working_directory, WizardRequest};
pub use step::WizardStep;
