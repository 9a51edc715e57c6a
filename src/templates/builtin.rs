use crate::model::{PipelineService, PipelineTemplate, TargetKind, TargetType};
use std::path::PathBuf;

pub(crate) struct BuiltinTemplate {
    pub label: &'static str,
    pub path: &'static str,
    pub language: &'static str,
    pub target_type: TargetType,
    pub target_kind: Option<TargetKind>,
    pub service: PipelineService,
    pub body: &'static str,
}

impl BuiltinTemplate {
    pub fn to_template(&self) -> PipelineTemplate {
        PipelineTemplate {
            label: self.label.to_string(),
            path: PathBuf::from(self.path),
            language: self.language.to_string(),
            target_type: self.target_type,
            target_kind: self.target_kind,
            service: self.service,
        }
    }
}

macro_rules! builtin {
    ($label:expr, $path:literal, $language:expr, $target_type:expr, $kind:expr, $service:expr) => {
        BuiltinTemplate {
            label: $label,
            path: $path,
            language: $language,
            target_type: $target_type,
            target_kind: $kind,
            service: $service,
            body: include_str!(concat!("builtin/", $path)),
        }
    };
}

use PipelineService::{AzurePipelines, GitHubActions};
use TargetKind::{LinuxApp, WindowsApp};
use TargetType::{None as BuildOnly, WebApp};

pub(crate) const BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    builtin!(
        "Node.js to Linux Web App",
        "azure-pipelines/node-linux-webapp.yml",
        "node",
        WebApp,
        Some(LinuxApp),
        AzurePipelines
    ),
    builtin!(
        "Node.js to Windows Web App",
        "azure-pipelines/node-windows-webapp.yml",
        "node",
        WebApp,
        Some(WindowsApp),
        AzurePipelines
    ),
    builtin!(
        "Python to Linux Web App",
        "azure-pipelines/python-linux-webapp.yml",
        "python",
        WebApp,
        Some(LinuxApp),
        AzurePipelines
    ),
    builtin!(
        "ASP.NET Core to Windows Web App",
        "azure-pipelines/dotnet-windows-webapp.yml",
        "dotnet",
        WebApp,
        Some(WindowsApp),
        AzurePipelines
    ),
    builtin!(
        "Java (Maven) to Linux Web App",
        "azure-pipelines/java-linux-webapp.yml",
        "java",
        WebApp,
        Some(LinuxApp),
        AzurePipelines
    ),
    builtin!(
        "Build only",
        "azure-pipelines/build-only.yml",
        "any",
        BuildOnly,
        None,
        AzurePipelines
    ),
    builtin!(
        "Node.js to Linux Web App",
        "github-actions/node-linux-webapp.yml",
        "node",
        WebApp,
        Some(LinuxApp),
        GitHubActions
    ),
    builtin!(
        "Python to Linux Web App",
        "github-actions/python-linux-webapp.yml",
        "python",
        WebApp,
        Some(LinuxApp),
        GitHubActions
    ),
    builtin!(
        "ASP.NET Core to Windows Web App",
        "github-actions/dotnet-windows-webapp.yml",
        "dotnet",
        WebApp,
        Some(WindowsApp),
        GitHubActions
    ),
    builtin!(
        "Java (Maven) to Linux Web App",
        "github-actions/java-linux-webapp.yml",
        "java",
        WebApp,
        Some(LinuxApp),
        GitHubActions
    ),
    builtin!(
        "Build only",
        "github-actions/build-only.yml",
        "any",
        BuildOnly,
        None,
        GitHubActions
    ),
];

pub(crate) fn builtin_body(path: &std::path::Path) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|t| std::path::Path::new(t.path) == path)
        .map(|t| t.body)
}
