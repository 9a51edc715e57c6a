pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{ClassifyArgs, CliArgs, Commands, ConfigureArgs, TemplatesArgs};
pub use output::{OutputFormat, OutputFormatter, RunSummary};
