//! pipewright - configure a CI/CD pipeline for a local git repository
//!
//! The wizard discovers the repository a user is working in, offers pipeline
//! templates that fit its languages, resolves the cloud resource to deploy to
//! and the project that will own the pipeline, then writes, commits and pushes
//! the pipeline file and queues its first run.
//!
//! # Core Concepts
//!
//! - **Wizard**: [`WizardOrchestrator`] runs the stages in order over a shared
//!   [`WizardInputs`] aggregate and reports each step to telemetry
//! - **Collaborators**: git, prompts, templates, cloud clients and pipeline
//!   provisioners sit behind traits held by [`WizardContext`]
//! - **Pipeline services**: Azure Pipelines or GitHub Actions, chosen from the
//!   repository's host
//!
//! # Example Usage
//!
//! ```ignore
//! use pipewright::{WizardContext, WizardOrchestrator, WizardRequest};
//!
//! async fn configure(ctx: WizardContext, folder: std::path::PathBuf) {
//!     let outcome = WizardOrchestrator::new(ctx)
//!         .run(&WizardRequest::new(vec![folder]))
//!         .await;
//!     match outcome {
//!         Ok(outcome) => println!("Queued {}", outcome.queued.url),
//!         Err(e) => eprintln!("{}", e.help_message()),
//!     }
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`wizard`]: stages, orchestration and error taxonomy
//! - [`git`]: repository plumbing and remote URL classification
//! - [`templates`]: catalog, language detection and rendering
//! - [`cloud`]: session, resource and project clients
//! - [`provisioner`]: per-service pipeline creation

pub mod cli;
pub mod cloud;
pub mod config;
pub mod git;
pub mod model;
pub mod progress;
pub mod prompt;
pub mod provisioner;
pub mod templates;
pub mod util;
pub mod wizard;

pub use config::{ConfigError, WizardConfig};
pub use model::{
    AzureResource, GitRepositoryParameters, PipelineService, PipelineTemplate,
    RepositoryIdentity, RepositoryProvider, RunSuffix, WizardInputs,
};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};
pub use wizard::{
    ErrorKind, WizardContext, WizardError, WizardOrchestrator, WizardOutcome, WizardRequest,
    WizardStep,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
