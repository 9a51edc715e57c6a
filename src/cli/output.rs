//! Output formatting for multiple formats
//!
//! Run summaries, template listings and remote classifications can be printed
//! as JSON, YAML or human-readable text.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::{PipelineService, PipelineTemplate, RepositoryIdentity, TargetKind};
use crate::wizard::WizardOutcome;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Serializable view of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub service: PipelineService,
    pub pipeline: String,
    pub run_id: String,
    pub url: String,
    pub file: String,
    pub commit: String,
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub target: Option<String>,
    pub service_connection: Option<String>,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub new_organization: bool,
}

impl RunSummary {
    pub fn from_outcome(outcome: &WizardOutcome) -> Self {
        let inputs = &outcome.inputs;
        let repository = inputs.source_repository.as_ref();
        Self {
            service: outcome.service,
            pipeline: outcome.queued.name.clone(),
            run_id: outcome.queued.id.clone(),
            url: outcome.queued.url.clone(),
            file: outcome.pipeline_file.to_string_lossy().replace('\\', "/"),
            commit: outcome.commit_id.clone(),
            repository: repository.map(|r| r.repository_id.clone()),
            branch: repository.map(|r| r.branch.clone()),
            target: inputs
                .target_resource
                .resource
                .as_ref()
                .map(|r| r.name.clone()),
            service_connection: inputs.pipeline_parameters.service_connection.clone(),
            organization: inputs.organization_name.clone(),
            project: inputs.project.as_ref().map(|p| p.name.clone()),
            new_organization: inputs.is_new_organization,
        }
    }
}

#[derive(Debug, Serialize)]
struct TemplateRow<'a> {
    label: &'a str,
    language: &'a str,
    service: PipelineService,
    target_kind: Option<TargetKind>,
    path: String,
}

impl<'a> From<&'a PipelineTemplate> for TemplateRow<'a> {
    fn from(template: &'a PipelineTemplate) -> Self {
        Self {
            label: &template.label,
            language: &template.language,
            service: template.service,
            target_kind: template.target_kind,
            path: template.path.to_string_lossy().replace('\\', "/"),
        }
    }
}

/// Output formatter for command results
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_run(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(summary).context("Failed to serialize run summary to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(summary).context("Failed to serialize run summary to YAML")
            }
            OutputFormat::Human => Ok(self.format_run_human(summary)),
        }
    }

    pub fn format_templates(&self, templates: &[PipelineTemplate]) -> Result<String> {
        let rows: Vec<TemplateRow<'_>> = templates.iter().map(TemplateRow::from).collect();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&rows).context("Failed to serialize templates to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(&rows).context("Failed to serialize templates to YAML")
            }
            OutputFormat::Human => Ok(self.format_templates_human(&rows)),
        }
    }

    pub fn format_identity(&self, identity: &RepositoryIdentity) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(identity).context("Failed to serialize identity to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(identity).context("Failed to serialize identity to YAML")
            }
            OutputFormat::Human => Ok(self.format_identity_human(identity)),
        }
    }

    // Human-readable formatting methods

    fn format_run_human(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str(&format!("✓ Pipeline queued on {}\n\n", summary.service));
        output.push_str(&format!("  Pipeline: {}\n", summary.pipeline));
        output.push_str(&format!("  Run:      {}\n", summary.url));
        output.push_str(&format!("  File:     {}\n", summary.file));
        output.push_str(&format!("  Commit:   {}\n", summary.commit));
        if let Some(repository) = &summary.repository {
            match &summary.branch {
                Some(branch) => output.push_str(&format!("  Source:   {} ({})\n", repository, branch)),
                None => output.push_str(&format!("  Source:   {}\n", repository)),
            }
        }
        if let Some(target) = &summary.target {
            output.push_str(&format!("  Target:   {}\n", target));
        }
        if let Some(connection) = &summary.service_connection {
            output.push_str(&format!("  Credentials: {}\n", connection));
        }
        if let (Some(organization), Some(project)) = (&summary.organization, &summary.project) {
            let marker = if summary.new_organization { " (new)" } else { "" };
            output.push_str(&format!(
                "  Project:  {}/{}{}\n",
                organization, project, marker
            ));
        }

        output
    }

    fn format_templates_human(&self, rows: &[TemplateRow<'_>]) -> String {
        if rows.is_empty() {
            return "No templates fit this repository.\n".to_string();
        }

        let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        let mut output = String::new();
        for row in rows {
            let kind = row
                .target_kind
                .map(|k| format!(" -> {}", k))
                .unwrap_or_default();
            output.push_str(&format!(
                "{:width$}  {} ({}){}\n",
                row.label,
                row.path,
                row.language,
                kind,
                width = width
            ));
        }
        output
    }

    fn format_identity_human(&self, identity: &RepositoryIdentity) -> String {
        let mut output = format!("Provider:   {}\n", identity.provider());
        match identity {
            RepositoryIdentity::AzureRepos {
                organization,
                project,
                repository,
            } => {
                output.push_str(&format!("Organization: {}\n", organization));
                output.push_str(&format!("Project:    {}\n", project));
                output.push_str(&format!("Repository: {}\n", repository));
            }
            RepositoryIdentity::GitHub { owner, repository } => {
                output.push_str(&format!("Owner:      {}\n", owner));
                output.push_str(&format!("Repository: {}\n", repository));
            }
        }
        output
    }
}
