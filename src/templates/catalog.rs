use super::builtin::{builtin_body, BUILTIN_TEMPLATES};
use crate::model::{PipelineService, PipelineTemplate, TargetKind, TargetType};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CATALOG_FILE: &str = "templates.yaml";

#[derive(Debug, Deserialize)]
struct CatalogFile {
    templates: Vec<PipelineTemplate>,
}

/// Set of known templates and where their bodies live
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<PipelineTemplate>,
    /// Directory template paths are relative to; `None` for the built-in set
    root: Option<PathBuf>,
}

impl TemplateCatalog {
    pub fn with_defaults() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES.iter().map(|t| t.to_template()).collect(),
            root: None,
        }
    }

    /// Loads `templates.yaml` from `dir`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let catalog_path = dir.join(CATALOG_FILE);
        let content = std::fs::read_to_string(&catalog_path)
            .with_context(|| format!("Failed to read {}", catalog_path.display()))?;
        let file: CatalogFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", catalog_path.display()))?;

        for template in &file.templates {
            let body_path = dir.join(&template.path);
            if !body_path.is_file() {
                anyhow::bail!(
                    "Template '{}' points at missing file {}",
                    template.label,
                    body_path.display()
                );
            }
        }

        debug!(
            dir = %dir.display(),
            templates = file.templates.len(),
            "Loaded template catalog"
        );
        Ok(Self {
            templates: file.templates,
            root: Some(dir.to_path_buf()),
        })
    }

    pub fn templates(&self) -> &[PipelineTemplate] {
        &self.templates
    }

    /// Templates for `service` that build one of `languages` or any language.
    ///
    /// Ordered by the position of their language in `languages`, language-agnostic
    /// templates last. With `target_kind` set, only web-app templates for that kind remain.
    pub fn matching(
        &self,
        service: PipelineService,
        languages: &[&str],
        target_kind: Option<TargetKind>,
    ) -> Vec<PipelineTemplate> {
        let rank = |template: &PipelineTemplate| -> Option<usize> {
            if template.is_language_agnostic() {
                return Some(languages.len());
            }
            languages
                .iter()
                .position(|l| template.language.eq_ignore_ascii_case(l))
        };

        let mut ranked: Vec<(usize, &PipelineTemplate)> = self
            .templates
            .iter()
            .filter(|t| t.service == service)
            .filter(|t| match target_kind {
                Some(kind) => {
                    t.target_type == TargetType::WebApp && t.effective_target_kind() == kind
                }
                None => true,
            })
            .filter_map(|t| rank(t).map(|r| (r, t)))
            .collect();

        // stable: catalog order within one language
        ranked.sort_by_key(|(r, _)| *r);
        ranked.into_iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn body(&self, template: &PipelineTemplate) -> Result<String> {
        match &self.root {
            Some(root) => {
                let path = root.join(&template.path);
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read template {}", path.display()))
            }
            None => builtin_body(&template.path)
                .map(str::to_string)
                .with_context(|| {
                    format!("No built-in template at {}", template.path.display())
                }),
        }
    }
}
