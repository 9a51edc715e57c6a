use crate::config::parse_service;
use crate::model::PipelineService;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Configure a CI/CD pipeline for a local git repository
#[derive(Parser, Debug)]
#[command(
    name = "pipewright",
    about = "Configure a CI/CD pipeline for a local git repository",
    version,
    author,
    long_about = "pipewright inspects a local git repository, picks a pipeline template that \
                  fits it, writes the pipeline file, commits and pushes it, then queues the \
                  first run on Azure Pipelines or GitHub Actions."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Show stage-by-stage progress logs")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the pipeline configuration wizard",
        long_about = "Walks through repository, template, deployment target and project \
                      selection, then commits the pipeline file and queues its first run.\n\n\
                      Examples:\n  \
                      pipewright configure\n  \
                      pipewright configure ./api ./web\n  \
                      pipewright configure --resource /subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/shop"
    )]
    Configure(ConfigureArgs),

    #[command(
        about = "List the templates that fit a repository",
        long_about = "Detects the languages in a repository and prints the pipeline templates \
                      the wizard would offer for it.\n\n\
                      Examples:\n  \
                      pipewright templates\n  \
                      pipewright templates /path/to/repo --service github-actions"
    )]
    Templates(TemplatesArgs),

    #[command(
        about = "Show which provider a remote URL belongs to",
        long_about = "Parses a git remote URL and prints the hosting provider and repository \
                      identity.\n\n\
                      Examples:\n  \
                      pipewright classify https://github.com/octo/shop.git\n  \
                      pipewright classify https://dev.azure.com/contoso/Web/_git/shop"
    )]
    Classify(ClassifyArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigureArgs {
    #[arg(
        value_name = "FOLDER",
        help = "Workspace folders to choose from (prompts for one when omitted)"
    )]
    pub folders: Vec<PathBuf>,

    #[arg(
        long,
        value_name = "RESOURCE_ID",
        help = "Deploy to this resource and skip target selection"
    )]
    pub resource: Option<String>,

    #[arg(long, value_name = "FILE", help = "Cloud environment file")]
    pub environment: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Directory containing a templates.yaml catalog")]
    pub templates: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SERVICE",
        value_parser = parse_service_arg,
        help = "Service for GitHub repositories (github-actions|azure-pipelines)"
    )]
    pub github_service: Option<PipelineService>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Remote to push to when the branch tracks none"
    )]
    pub remote: Option<String>,

    #[arg(long, help = "Do not open the queued run in a browser")]
    pub no_browse: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct TemplatesArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to repository (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        value_name = "SERVICE",
        value_parser = parse_service_arg,
        default_value = "azure-pipelines",
        help = "Pipeline service (github-actions|azure-pipelines)"
    )]
    pub service: PipelineService,

    #[arg(long, value_name = "DIR", help = "Directory containing a templates.yaml catalog")]
    pub templates: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(value_name = "URL", help = "Remote URL to classify")]
    pub url: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_service_arg(s: &str) -> Result<PipelineService, String> {
    parse_service(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_configure_args() {
        let args = CliArgs::parse_from(["pipewright", "configure"]);
        match args.command {
            Commands::Configure(configure) => {
                assert!(configure.folders.is_empty());
                assert!(configure.resource.is_none());
                assert!(configure.github_service.is_none());
                assert!(!configure.no_browse);
                assert_eq!(configure.format, OutputFormatArg::Human);
            }
            _ => panic!("Expected Configure command"),
        }
    }

    #[test]
    fn test_configure_with_folders_and_flags() {
        let args = CliArgs::parse_from([
            "pipewright",
            "configure",
            "/work/api",
            "/work/web",
            "--github-service",
            "azure-pipelines",
            "--remote",
            "upstream",
            "--no-browse",
        ]);
        match args.command {
            Commands::Configure(configure) => {
                assert_eq!(
                    configure.folders,
                    vec![PathBuf::from("/work/api"), PathBuf::from("/work/web")]
                );
                assert_eq!(
                    configure.github_service,
                    Some(PipelineService::AzurePipelines)
                );
                assert_eq!(configure.remote.as_deref(), Some("upstream"));
                assert!(configure.no_browse);
            }
            _ => panic!("Expected Configure command"),
        }
    }

    #[test]
    fn test_templates_service_parsing() {
        let args = CliArgs::parse_from(["pipewright", "templates", "-s", "github-actions"]);
        match args.command {
            Commands::Templates(templates) => {
                assert_eq!(templates.service, PipelineService::GitHubActions);
                assert!(templates.repository_path.is_none());
            }
            _ => panic!("Expected Templates command"),
        }

        assert!(CliArgs::try_parse_from(["pipewright", "templates", "-s", "jenkins"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from([
            "pipewright",
            "classify",
            "https://github.com/octo/shop",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));

        assert!(CliArgs::try_parse_from(["pipewright", "-v", "-q", "classify", "x"]).is_err());
    }
}
