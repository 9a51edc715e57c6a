//! Git plumbing consumed by the wizard
//!
//! The wizard only talks to [`GitContext`]; [`GitCli`] shells out to `git`
//! and [`MockGitContext`] keeps everything in memory for tests.

mod cli;
mod context;
mod mock;
pub mod url;

pub use cli::{unique_relative_path, GitCli};
pub use context::{BranchDetails, GitContext, RemoteInfo};
pub use mock::MockGitContext;
pub use url::{classify, ClassifyError};
