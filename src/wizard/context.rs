//! Collaborators shared by every wizard stage

use crate::cloud::{InMemoryCloud, RemoteProjectClient, SessionProvider, TargetResourceClient};
use crate::git::GitContext;
use crate::progress::{ProgressHandler, Telemetry};
use crate::prompt::PromptSurface;
use crate::provisioner::ProvisionerFactory;
use crate::templates::{LocalTemplates, TemplateAnalyzer, TemplateRenderer};
use std::sync::Arc;

/// Context that owns all long-lived wizard dependencies
pub struct WizardContext {
    pub sessions: Arc<dyn SessionProvider>,
    pub git: Arc<dyn GitContext>,
    pub analyzer: Arc<dyn TemplateAnalyzer>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub targets: Arc<dyn TargetResourceClient>,
    pub projects: Arc<dyn RemoteProjectClient>,
    pub provisioners: Arc<dyn ProvisionerFactory>,
    pub prompt: Arc<dyn PromptSurface>,
    pub telemetry: Arc<Telemetry>,
}

impl WizardContext {
    /// Wires one [`InMemoryCloud`] as the session, target and project client
    pub fn offline(
        cloud: Arc<InMemoryCloud>,
        git: Arc<dyn GitContext>,
        templates: Arc<LocalTemplates>,
        provisioners: Arc<dyn ProvisionerFactory>,
        prompt: Arc<dyn PromptSurface>,
        progress: Arc<dyn ProgressHandler>,
    ) -> Self {
        Self {
            sessions: cloud.clone(),
            git,
            analyzer: templates.clone(),
            renderer: templates,
            targets: cloud.clone(),
            projects: cloud,
            provisioners,
            prompt,
            telemetry: Arc::new(Telemetry::new(progress)),
        }
    }
}
