use super::catalog::TemplateCatalog;
use super::detection::{detect_languages, ScanConfig};
use super::render::render_placeholders;
use crate::model::{
    AzureResource, PipelineService, PipelineTemplate, RepositoryProvider, WizardInputs,
};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Computes the templates that fit a repository and an optional known target
#[async_trait]
pub trait TemplateAnalyzer: Send + Sync {
    /// Ordered best-first; empty when nothing fits
    async fn applicable_templates(
        &self,
        repo_path: &Path,
        provider: RepositoryProvider,
        service: PipelineService,
        target: Option<&AzureResource>,
    ) -> Result<Vec<PipelineTemplate>>;
}

#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    async fn render(&self, template: &PipelineTemplate, inputs: &WizardInputs) -> Result<String>;
}

/// Catalog-backed analyzer and renderer working on the local checkout
pub struct LocalTemplates {
    catalog: Arc<TemplateCatalog>,
    scan: ScanConfig,
}

impl LocalTemplates {
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            scan: ScanConfig::default(),
        }
    }

    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }
}

#[async_trait]
impl TemplateAnalyzer for LocalTemplates {
    async fn applicable_templates(
        &self,
        repo_path: &Path,
        provider: RepositoryProvider,
        service: PipelineService,
        target: Option<&AzureResource>,
    ) -> Result<Vec<PipelineTemplate>> {
        // Actions workflows only run for repositories hosted on GitHub
        if service == PipelineService::GitHubActions && provider != RepositoryProvider::GitHub {
            return Ok(Vec::new());
        }

        let target_kind = match target {
            Some(resource) => match resource.target_kind() {
                Some(kind) => Some(kind),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let path = repo_path.to_path_buf();
        let scan = self.scan.clone();
        let detections = tokio::task::spawn_blocking(move || detect_languages(&path, &scan))
            .await
            .context("Language detection task failed")??;
        let languages: Vec<&str> = detections.iter().map(|d| d.language).collect();

        let templates = self.catalog.matching(service, &languages, target_kind);
        info!(
            languages = ?languages,
            service = %service,
            candidates = templates.len(),
            "Computed applicable templates"
        );
        Ok(templates)
    }
}

#[async_trait]
impl TemplateRenderer for LocalTemplates {
    async fn render(&self, template: &PipelineTemplate, inputs: &WizardInputs) -> Result<String> {
        let body = self.catalog.body(template)?;
        let values = inputs.template_variables();
        let rendered = render_placeholders(&body, &values)
            .with_context(|| format!("Failed to render template '{}'", template.label))?;
        if rendered.trim().is_empty() {
            bail!("Template '{}' rendered to an empty file", template.label);
        }
        debug!(template = %template.label, bytes = rendered.len(), "Rendered template");
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        GitRepositoryParameters, RepositoryIdentity, TargetKind, TargetType,
    };
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn node_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        dir
    }

    fn resource(kind: &str) -> AzureResource {
        AzureResource {
            id: "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Web/sites/shop"
                .to_string(),
            name: "shop".to_string(),
            kind: kind.to_string(),
            location: String::new(),
        }
    }

    #[tokio::test]
    async fn test_node_repository_templates() {
        let repo = node_repo();
        let templates = LocalTemplates::new(TemplateCatalog::with_defaults());

        let found = templates
            .applicable_templates(
                repo.path(),
                RepositoryProvider::AzureRepos,
                PipelineService::AzurePipelines,
                None,
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].language, "node");
        assert_eq!(found.last().unwrap().target_type, TargetType::None);
    }

    #[tokio::test]
    async fn test_known_target_narrows_kind() {
        let repo = node_repo();
        let templates = LocalTemplates::new(TemplateCatalog::with_defaults());
        let target = resource("app,linux");

        let found = templates
            .applicable_templates(
                repo.path(),
                RepositoryProvider::GitHub,
                PipelineService::GitHubActions,
                Some(&target),
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target_kind, Some(TargetKind::LinuxApp));

        let unsupported = resource("api");
        let none = templates
            .applicable_templates(
                repo.path(),
                RepositoryProvider::GitHub,
                PipelineService::GitHubActions,
                Some(&unsupported),
            )
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_actions_require_github() {
        let repo = node_repo();
        let templates = LocalTemplates::new(TemplateCatalog::with_defaults());
        let found = templates
            .applicable_templates(
                repo.path(),
                RepositoryProvider::AzureRepos,
                PipelineService::GitHubActions,
                None,
            )
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_render_build_only() {
        let templates = LocalTemplates::new(TemplateCatalog::with_defaults());
        let template = templates
            .catalog()
            .templates()
            .iter()
            .find(|t| t.path == PathBuf::from("azure-pipelines/build-only.yml"))
            .cloned()
            .unwrap();

        let identity = RepositoryIdentity::GitHub {
            owner: "octo".to_string(),
            repository: "shop".to_string(),
        };
        let mut inputs = WizardInputs::new();
        inputs.pipeline_parameters.working_directory = "api".to_string();
        inputs.source_repository = Some(GitRepositoryParameters {
            provider: identity.provider(),
            repository_id: identity.repository_id(),
            repository_name: identity.repository_name().to_string(),
            identity,
            remote_name: "origin".to_string(),
            remote_url: "https://github.com/octo/shop.git".to_string(),
            branch: "main".to_string(),
            commit_id: String::new(),
            local_path: PathBuf::from("/work/shop/api"),
            root_path: PathBuf::from("/work/shop"),
            working_directory: "api".to_string(),
        });

        let rendered = templates.render(&template, &inputs).await.unwrap();
        assert!(rendered.contains("  - main"));
        assert!(rendered.contains("Building shop from api"));
    }

    #[tokio::test]
    async fn test_render_reports_missing_values() {
        let templates = LocalTemplates::new(TemplateCatalog::with_defaults());
        let template = templates
            .catalog()
            .templates()
            .iter()
            .find(|t| t.target_type == TargetType::WebApp)
            .cloned()
            .unwrap();

        let err = templates
            .render(&template, &WizardInputs::new())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("resourceName"));
    }
}
