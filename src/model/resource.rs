//! Cloud-side reference data: subscriptions, sessions and deployable resources

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription visible to the signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tenant_id: String,
}

/// Opaque credentials; never logged
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials(String);

impl SessionCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionCredentials(***)")
    }
}

/// Session scoped to one subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureSession {
    pub subscription_id: String,
    pub credentials: SessionCredentials,
    pub tenant_id: String,
    pub endpoint: String,
    /// Sign-in name of the account, usually an email address
    pub user_id: String,
}

impl AzureSession {
    /// Part of the user id before `@`
    pub fn user_local_part(&self) -> &str {
        self.user_id.split('@').next().unwrap_or_default()
    }
}

/// Kind of deployment target a template can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetType {
    /// Build-only pipeline, no resource needed
    None,
    #[default]
    WebApp,
}

/// App Service flavor, matching the resource `kind` property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    #[serde(rename = "app")]
    WindowsApp,
    #[serde(rename = "app,linux")]
    LinuxApp,
    #[serde(rename = "app,linux,container")]
    LinuxContainerApp,
    #[serde(rename = "functionapp")]
    FunctionApp,
    #[serde(rename = "functionapp,linux")]
    FunctionAppLinux,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::WindowsApp => "app",
            TargetKind::LinuxApp => "app,linux",
            TargetKind::LinuxContainerApp => "app,linux,container",
            TargetKind::FunctionApp => "functionapp",
            TargetKind::FunctionAppLinux => "functionapp,linux",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        let normalized: Vec<String> = kind
            .split(',')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .collect();
        match normalized.join(",").as_str() {
            "app" => Some(TargetKind::WindowsApp),
            "app,linux" => Some(TargetKind::LinuxApp),
            "app,linux,container" => Some(TargetKind::LinuxContainerApp),
            "functionapp" => Some(TargetKind::FunctionApp),
            "functionapp,linux" => Some(TargetKind::FunctionAppLinux),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployable resource (e.g. a web app)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureResource {
    /// Full ARM id: `/subscriptions/{id}/resourceGroups/{rg}/providers/{type}/{name}`
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub location: String,
}

impl AzureResource {
    pub fn subscription_id(&self) -> Option<&str> {
        parse_segment(&self.id, "subscriptions")
    }

    pub fn resource_group(&self) -> Option<&str> {
        parse_segment(&self.id, "resourceGroups")
    }

    pub fn target_kind(&self) -> Option<TargetKind> {
        TargetKind::parse(&self.kind)
    }
}

fn parse_segment<'a>(id: &'a str, key: &str) -> Option<&'a str> {
    let mut segments = id.split('/').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment.eq_ignore_ascii_case(key) {
            return segments.next();
        }
    }
    None
}
