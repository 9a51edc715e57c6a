//! Shared wiring for wizard integration tests

#![allow(dead_code)]

use pipewright::cloud::{EnvironmentSpec, InMemoryCloud};
use pipewright::git::MockGitContext;
use pipewright::model::{PipelineService, RunSuffix};
use pipewright::progress::RecordingHandler;
use pipewright::prompt::{ScriptedAnswer, ScriptedPrompt};
use pipewright::provisioner::LocalProvisionerFactory;
use pipewright::templates::{LocalTemplates, TemplateCatalog};
use pipewright::{WizardContext, WizardError, WizardOrchestrator, WizardOutcome, WizardRequest};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const SUFFIX: &str = "ab12c";

pub const ENVIRONMENT: &str = r#"
user: jane@contoso.com
tenant_id: tenant-1
subscriptions:
  - id: sub-1
    name: Production
    resources:
      - name: shop-web
        kind: app,linux
        resource_group: rg-web
        location: westeurope
      - name: legacy-web
        kind: app
        resource_group: rg-web
organizations:
  - name: contoso
    projects:
      - name: Web
        repositories: [shop]
      - name: Tools
"#;

pub fn environment() -> EnvironmentSpec {
    EnvironmentSpec::from_yaml(ENVIRONMENT).expect("sample environment parses")
}

/// Workspace folder with a Node.js manifest
pub fn node_workspace() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("package.json"), r#"{"name": "shop"}"#)
        .expect("Failed to write package.json");
    dir
}

pub fn python_workspace() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("requirements.txt"), "flask\n")
        .expect("Failed to write requirements.txt");
    dir
}

pub struct Harness {
    pub orchestrator: WizardOrchestrator,
    pub prompt: Arc<ScriptedPrompt>,
    pub git: Arc<MockGitContext>,
    pub cloud: Arc<InMemoryCloud>,
    pub progress: Arc<RecordingHandler>,
}

pub struct HarnessBuilder {
    spec: EnvironmentSpec,
    git: MockGitContext,
    answers: Vec<ScriptedAnswer>,
    catalog: TemplateCatalog,
    github_service: PipelineService,
}

impl HarnessBuilder {
    pub fn new(git: MockGitContext) -> Self {
        Self {
            spec: environment(),
            git,
            answers: Vec::new(),
            catalog: TemplateCatalog::with_defaults(),
            github_service: PipelineService::GitHubActions,
        }
    }

    pub fn environment(mut self, spec: EnvironmentSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn answers(mut self, answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        self.answers.extend(answers);
        self
    }

    pub fn catalog(mut self, catalog: TemplateCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn github_service(mut self, service: PipelineService) -> Self {
        self.github_service = service;
        self
    }

    pub fn build(self) -> Harness {
        let cloud = Arc::new(InMemoryCloud::new(self.spec));
        let git = Arc::new(self.git);
        let prompt = Arc::new(ScriptedPrompt::with_answers(self.answers));
        let progress = Arc::new(RecordingHandler::new());
        let suffix = RunSuffix::fixed(SUFFIX).expect("valid suffix");
        let provisioners = LocalProvisionerFactory::new(cloud.clone(), suffix)
            .with_github_service(self.github_service);

        let ctx = WizardContext::offline(
            cloud.clone(),
            git.clone(),
            Arc::new(LocalTemplates::new(self.catalog)),
            Arc::new(provisioners),
            prompt.clone(),
            progress.clone(),
        );
        Harness {
            orchestrator: WizardOrchestrator::new(ctx),
            prompt,
            git,
            cloud,
            progress,
        }
    }
}

impl Harness {
    pub async fn run(&self, request: WizardRequest) -> Result<WizardOutcome, WizardError> {
        self.orchestrator.run(&request).await
    }

    pub async fn run_in(&self, folder: &Path) -> Result<WizardOutcome, WizardError> {
        self.run(WizardRequest::new(vec![folder.to_path_buf()])).await
    }
}

/// Mock repository rooted at `root` with one GitHub remote and a scripted push
pub fn github_repo(root: &Path) -> MockGitContext {
    let git = MockGitContext::new(root).with_remote("origin", Some("https://github.com/octo/shop.git"));
    git.push_succeeds("c0ffee");
    git
}

pub fn azure_repo(root: &Path) -> MockGitContext {
    let git = MockGitContext::new(root)
        .with_remote("origin", Some("https://dev.azure.com/contoso/Web/_git/shop"));
    git.push_succeeds("c0ffee");
    git
}

pub fn resource_id(name: &str) -> String {
    format!(
        "/subscriptions/sub-1/resourceGroups/rg-web/providers/Microsoft.Web/sites/{}",
        name
    )
}

pub fn paths(dirs: &[&TempDir]) -> Vec<PathBuf> {
    dirs.iter().map(|d| d.path().to_path_buf()).collect()
}
