//! Configuration management for pipewright
//!
//! Settings come from environment variables with defaults, then CLI flags
//! override them.
//!
//! # Environment Variables
//!
//! - `PIPEWRIGHT_ENVIRONMENT`: cloud environment file - default:
//!   `<config dir>/pipewright/environment.yaml`
//! - `PIPEWRIGHT_TEMPLATES_DIR`: directory holding a `templates.yaml` catalog -
//!   default: built-in templates
//! - `PIPEWRIGHT_GITHUB_SERVICE`: service used for GitHub repositories
//!   (github-actions|azure-pipelines) - default: "github-actions"
//! - `PIPEWRIGHT_REMOTE`: remote to use when a branch tracks none and several exist
//! - `PIPEWRIGHT_BROWSE`: open the queued run in a browser (true|false) - default: "true"
//! - `PIPEWRIGHT_LOG_LEVEL`: logging level - default: "warn"

use crate::model::PipelineService;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const ENVIRONMENT_ENV: &str = "PIPEWRIGHT_ENVIRONMENT";
pub const TEMPLATES_DIR_ENV: &str = "PIPEWRIGHT_TEMPLATES_DIR";
pub const GITHUB_SERVICE_ENV: &str = "PIPEWRIGHT_GITHUB_SERVICE";
pub const REMOTE_ENV: &str = "PIPEWRIGHT_REMOTE";
pub const BROWSE_ENV: &str = "PIPEWRIGHT_BROWSE";

const DEFAULT_LOG_LEVEL: &str = "warn";
const ENVIRONMENT_FILE: &str = "environment.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid pipeline service: {0}. Valid options: github-actions, azure-pipelines")]
    InvalidService(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

pub fn parse_service(value: &str) -> Result<PipelineService, ConfigError> {
    PipelineService::from_str_loose(value)
        .ok_or_else(|| ConfigError::InvalidService(value.to_string()))
}

/// Default location of the cloud environment file
pub fn default_environment_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pipewright").join(ENVIRONMENT_FILE))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Cloud environment description; `None` when no config dir is known
    pub environment_file: Option<PathBuf>,

    /// Template catalog directory; built-in templates when unset
    pub templates_dir: Option<PathBuf>,

    pub github_service: PipelineService,

    /// Remote picked without prompting when present
    pub preferred_remote: Option<String>,

    pub browse: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            environment_file: default_environment_path(),
            templates_dir: None,
            github_service: PipelineService::GitHubActions,
            preferred_remote: None,
            browse: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl WizardConfig {
    /// Defaults overlaid with `PIPEWRIGHT_*` variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_empty_var(ENVIRONMENT_ENV) {
            config.environment_file = Some(PathBuf::from(path));
        }
        config.templates_dir = non_empty_var(TEMPLATES_DIR_ENV).map(PathBuf::from);
        if let Some(service) = non_empty_var(GITHUB_SERVICE_ENV) {
            config.github_service = parse_service(&service)?;
        }
        config.preferred_remote = non_empty_var(REMOTE_ENV);
        if let Some(browse) = non_empty_var(BROWSE_ENV) {
            config.browse = browse
                .trim()
                .parse::<bool>()
                .map_err(|e| ConfigError::ParseError {
                    field: BROWSE_ENV.to_string(),
                    error: e.to_string(),
                })?;
        }
        if let Some(level) = non_empty_var(crate::util::logging::LOG_LEVEL_ENV) {
            config.log_level = level.to_lowercase();
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.templates_dir {
            if !dir.is_dir() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Templates directory {} does not exist",
                    dir.display()
                )));
            }
        }

        if let Some(remote) = &self.preferred_remote {
            if remote.chars().any(char::is_whitespace) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Remote name '{}' contains whitespace",
                    remote
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for WizardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipewright Configuration:")?;
        match &self.environment_file {
            Some(path) => writeln!(f, "  Environment: {}", path.display())?,
            None => writeln!(f, "  Environment: (none)")?,
        }
        match &self.templates_dir {
            Some(dir) => writeln!(f, "  Templates: {}", dir.display())?,
            None => writeln!(f, "  Templates: built-in")?,
        }
        writeln!(f, "  GitHub Service: {}", self.github_service)?;
        if let Some(remote) = &self.preferred_remote {
            writeln!(f, "  Preferred Remote: {}", remote)?;
        }
        writeln!(f, "  Browse: {}", self.browse)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
