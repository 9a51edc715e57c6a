//! Remote URL classification
//!
//! Azure Repos shapes are checked before GitHub shapes. Classification is a
//! pure function of the URL text.

use crate::model::{RepositoryIdentity, RepositoryProvider};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("remote has no URL configured")]
    MissingUrl,

    #[error("remote URL '{0}' is not hosted on a supported provider")]
    Unrecognized(String),
}

fn azure_repos_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)^https?://(?:[^@/]+@)?dev\.azure\.com/(?P<org>[^/]+)/(?P<project>[^/]+)/_git/(?P<repo>[^/?#]+?)/?$",
            r"(?i)^https?://(?:[^@/]+@)?(?P<org>[^./]+)\.visualstudio\.com/(?:DefaultCollection/)?(?P<project>[^/]+)/_git/(?P<repo>[^/?#]+?)/?$",
            r"(?i)^(?:ssh://)?git@ssh\.dev\.azure\.com[:/]v3/(?P<org>[^/]+)/(?P<project>[^/]+)/(?P<repo>[^/]+?)/?$",
            r"(?i)^(?:ssh://)?[^@/]+@vs-ssh\.visualstudio\.com[:/]v3/(?P<org>[^/]+)/(?P<project>[^/]+)/(?P<repo>[^/]+?)/?$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    })
}

fn github_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)^https?://(?:[^@/]+@)?(?:www\.)?github\.com/(?P<owner>[^/]+)/(?P<repo>[^/?#]+?)(?:\.git)?/?$",
            r"(?i)^(?:ssh://)?git@github\.com[:/](?P<owner>[^/]+)/(?P<repo>[^/]+?)(?:\.git)?/?$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    })
}

pub fn is_azure_repos_url(url: &str) -> bool {
    let url = url.trim();
    azure_repos_patterns().iter().any(|re| re.is_match(url))
}

pub fn parse_azure_repos_url(url: &str) -> Option<RepositoryIdentity> {
    let url = url.trim();
    azure_repos_patterns().iter().find_map(|re| {
        let caps = re.captures(url)?;
        Some(RepositoryIdentity::AzureRepos {
            organization: decode(&caps["org"]),
            project: decode(&caps["project"]),
            repository: decode(&caps["repo"]),
        })
    })
}

pub fn is_github_url(url: &str) -> bool {
    let url = url.trim();
    github_patterns().iter().any(|re| re.is_match(url))
}

pub fn parse_github_url(url: &str) -> Option<RepositoryIdentity> {
    let url = url.trim();
    github_patterns().iter().find_map(|re| {
        let caps = re.captures(url)?;
        Some(RepositoryIdentity::GitHub {
            owner: caps["owner"].to_string(),
            repository: caps["repo"].to_string(),
        })
    })
}

/// Classifies a remote URL into its hosting provider and identity
pub fn classify(url: Option<&str>) -> Result<RepositoryIdentity, ClassifyError> {
    let url = match url.map(str::trim) {
        Some(u) if !u.is_empty() => u,
        _ => return Err(ClassifyError::MissingUrl),
    };

    if let Some(identity) = parse_azure_repos_url(url) {
        return Ok(identity);
    }
    if let Some(identity) = parse_github_url(url) {
        return Ok(identity);
    }
    Err(ClassifyError::Unrecognized(url.to_string()))
}

pub fn provider_of(url: &str) -> Option<RepositoryProvider> {
    classify(Some(url)).ok().map(|identity| identity.provider())
}

/// Decodes `%XX` escapes (project names with spaces arrive as `%20`)
fn decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
