//! Command handlers; each returns the process exit code

use super::commands::{ClassifyArgs, ConfigureArgs, TemplatesArgs};
use super::output::{OutputFormatter, RunSummary};
use crate::cloud::{EnvironmentSpec, InMemoryCloud};
use crate::config::WizardConfig;
use crate::git::{classify, ClassifyError, GitCli};
use crate::model::{PipelineService, RepositoryProvider, RunSuffix};
use crate::progress::LoggingHandler;
use crate::prompt::TerminalPrompt;
use crate::provisioner::LocalProvisionerFactory;
use crate::templates::{LocalTemplates, TemplateAnalyzer, TemplateCatalog};
use crate::wizard::{WizardContext, WizardError, WizardOrchestrator, WizardRequest};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

const EXIT_FAILURE: i32 = 1;

/// Flags win over `PIPEWRIGHT_*` variables
pub fn resolve_config(args: &ConfigureArgs) -> Result<WizardConfig> {
    let mut config = WizardConfig::from_env()?;
    if let Some(path) = &args.environment {
        config.environment_file = Some(path.clone());
    }
    if let Some(dir) = &args.templates {
        config.templates_dir = Some(dir.clone());
    }
    if let Some(service) = args.github_service {
        config.github_service = service;
    }
    if let Some(remote) = &args.remote {
        config.preferred_remote = Some(remote.clone());
    }
    if args.no_browse {
        config.browse = false;
    }
    config.validate()?;
    Ok(config)
}

pub fn load_catalog(dir: Option<&Path>) -> Result<TemplateCatalog> {
    match dir {
        Some(dir) => TemplateCatalog::from_dir(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display())),
        None => Ok(TemplateCatalog::with_defaults()),
    }
}

fn load_environment(path: Option<&Path>) -> Result<EnvironmentSpec> {
    let path = path.ok_or_else(|| {
        anyhow!("No cloud environment file configured. Pass --environment or set PIPEWRIGHT_ENVIRONMENT")
    })?;
    if !path.exists() {
        return Err(anyhow!(
            "Cloud environment file {} does not exist. Pass --environment or set PIPEWRIGHT_ENVIRONMENT",
            path.display()
        ));
    }
    Ok(EnvironmentSpec::load(path)?)
}

pub async fn handle_configure(args: &ConfigureArgs, quiet: bool, suffix: RunSuffix) -> i32 {
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };
    debug!("{}", config);

    let spec = match load_environment(config.environment_file.as_deref()) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };
    let catalog = match load_catalog(config.templates_dir.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    let cloud = Arc::new(InMemoryCloud::new(spec));
    let provisioners = LocalProvisionerFactory::new(cloud.clone(), suffix)
        .with_github_service(config.github_service)
        .with_browse(config.browse);
    let ctx = WizardContext::offline(
        cloud,
        Arc::new(GitCli::new()),
        Arc::new(LocalTemplates::new(catalog)),
        Arc::new(provisioners),
        Arc::new(TerminalPrompt::new()),
        Arc::new(LoggingHandler),
    );

    let mut request = WizardRequest::new(args.folders.clone());
    if let Some(resource) = &args.resource {
        request = request.with_target(resource.clone());
    }
    if let Some(remote) = &config.preferred_remote {
        request = request.with_preferred_remote(remote.clone());
    }

    match WizardOrchestrator::new(ctx).run(&request).await {
        Ok(outcome) => {
            if !quiet {
                let formatter = OutputFormatter::new(args.format.into());
                match formatter.format_run(&RunSummary::from_outcome(&outcome)) {
                    Ok(output) => print!("{}", output),
                    Err(e) => {
                        error!("Failed to format output: {}", e);
                        eprintln!("Error: Failed to format output: {}", e);
                        return EXIT_FAILURE;
                    }
                }
            }
            0
        }
        Err(e) => {
            if let Some(message) = failure_report(&e) {
                eprintln!("{}", message);
            }
            e.exit_code()
        }
    }
}

/// Message for stderr; cancellations stay silent
fn failure_report(e: &WizardError) -> Option<String> {
    if e.is_cancelled() {
        info!("Pipeline configuration canceled");
        return None;
    }
    error!("Pipeline configuration failed: {}", e);
    Some(e.help_message())
}

fn provider_for(service: PipelineService) -> RepositoryProvider {
    match service {
        PipelineService::GitHubActions => RepositoryProvider::GitHub,
        PipelineService::AzurePipelines => RepositoryProvider::AzureRepos,
    }
}

async fn list_templates(args: &TemplatesArgs) -> Result<String> {
    let repo_path = match &args.repository_path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    if !repo_path.is_dir() {
        return Err(anyhow!("{} is not a directory", repo_path.display()));
    }

    let templates_dir: Option<PathBuf> = args
        .templates
        .clone()
        .or_else(|| WizardConfig::from_env().ok().and_then(|c| c.templates_dir));
    let analyzer = LocalTemplates::new(load_catalog(templates_dir.as_deref())?);
    let templates = analyzer
        .applicable_templates(&repo_path, provider_for(args.service), args.service, None)
        .await?;

    OutputFormatter::new(args.format.into()).format_templates(&templates)
}

pub async fn handle_templates(args: &TemplatesArgs) -> i32 {
    match list_templates(args).await {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

pub fn handle_classify(args: &ClassifyArgs) -> i32 {
    let identity = match classify(Some(args.url.as_str())) {
        Ok(identity) => identity,
        Err(ClassifyError::MissingUrl) => {
            eprintln!("Error: The URL is empty");
            return EXIT_FAILURE;
        }
        Err(ClassifyError::Unrecognized(url)) => {
            eprintln!(
                "Error: {} is neither a GitHub nor an Azure Repos URL\n\nHelp: Only GitHub and Azure Repos remotes are supported.",
                url
            );
            return EXIT_FAILURE;
        }
    };

    match OutputFormatter::new(args.format.into()).format_identity(&identity) {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use tempfile::TempDir;

    fn classify_args(url: &str) -> ClassifyArgs {
        ClassifyArgs {
            url: url.to_string(),
            format: OutputFormatArg::Human,
        }
    }

    #[test]
    fn test_classify_exit_codes() {
        assert_eq!(handle_classify(&classify_args("https://github.com/octo/shop.git")), 0);
        assert_eq!(handle_classify(&classify_args("https://gitlab.com/octo/shop")), 1);
        assert_eq!(handle_classify(&classify_args("")), 1);
    }

    #[test]
    fn test_load_environment_requires_existing_file() {
        assert!(load_environment(None).is_err());
        assert!(load_environment(Some(Path::new("/definitely/missing.yaml"))).is_err());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("environment.yaml");
        std::fs::write(&path, "user: jane@contoso.com\n").unwrap();
        let spec = load_environment(Some(&path)).unwrap();
        assert_eq!(spec.user, "jane@contoso.com");
    }

    #[tokio::test]
    async fn test_list_templates_for_node_repository() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        let args = TemplatesArgs {
            repository_path: Some(dir.path().to_path_buf()),
            service: PipelineService::AzurePipelines,
            templates: None,
            format: OutputFormatArg::Human,
        };

        let output = list_templates(&args).await.unwrap();
        assert!(output.contains("Node.js to Linux Web App"));
        assert!(output.contains("Build only"));
        assert!(!output.contains("Python"));
    }

    #[test]
    fn test_cancellation_is_not_reported() {
        assert_eq!(failure_report(&WizardError::UserCancelled), None);
        assert_eq!(WizardError::UserCancelled.exit_code(), 130);

        let report = failure_report(&WizardError::NotSignedIn).unwrap();
        assert!(report.contains("Not signed in"));
    }

    #[test]
    fn test_provider_for_service() {
        assert_eq!(
            provider_for(PipelineService::GitHubActions),
            RepositoryProvider::GitHub
        );
        assert_eq!(
            provider_for(PipelineService::AzurePipelines),
            RepositoryProvider::AzureRepos
        );
    }
}
