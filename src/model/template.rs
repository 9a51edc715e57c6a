use super::provider::PipelineService;
use super::resource::{TargetKind, TargetType};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Candidate pipeline definition plus the repository/target shapes it supports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTemplate {
    pub label: String,
    /// Location of the template body inside its catalog
    pub path: PathBuf,
    /// Language the template builds, or `any`
    #[serde(default = "any_language")]
    pub language: String,
    #[serde(default)]
    pub target_type: TargetType,
    #[serde(default)]
    pub target_kind: Option<TargetKind>,
    pub service: PipelineService,
}

fn any_language() -> String {
    ANY_LANGUAGE.to_string()
}

pub const ANY_LANGUAGE: &str = "any";

impl PipelineTemplate {
    /// Kind used to list candidate resources; falls back to plain Windows apps
    pub fn effective_target_kind(&self) -> TargetKind {
        self.target_kind.unwrap_or_default()
    }

    pub fn is_language_agnostic(&self) -> bool {
        self.language.eq_ignore_ascii_case(ANY_LANGUAGE)
    }
}
