//! Organization/project container resolution for Azure Pipelines

use super::choose::{choose, ready, ValuedOptions};
use super::context::WizardContext;
use super::error::WizardError;
use super::step::WizardStep;
use crate::cloud::{derive_organization_name, RemoteProjectClient};
use crate::model::{RemoteProject, RepositoryIdentity, WizardInputs};
use crate::prompt::{ChoiceItem, ChoiceRequest, TextRequest};
use futures_util::FutureExt;
use tracing::{debug, info};

const STEP: WizardStep = WizardStep::ResolveProject;

/// Project created in a brand-new organization
pub const NEW_ORGANIZATION_PROJECT: &str = "AzurePipelines";

/// Fails with `InvalidOrganizationName` when the client rejects `name`
pub async fn ensure_organization_name(
    projects: &dyn RemoteProjectClient,
    name: &str,
) -> Result<(), WizardError> {
    let problem = projects
        .validate_organization_name(name)
        .await
        .map_err(WizardError::remote(STEP, "Validate organization name"))?;
    match problem {
        Some(reason) => Err(WizardError::InvalidOrganizationName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Writes `organization_name`, `project`, `is_new_organization` and, for Azure
/// Repos, `remote_repository_id`.
pub(crate) async fn resolve_remote_project(
    ctx: &WizardContext,
    identity: &RepositoryIdentity,
    inputs: &mut WizardInputs,
) -> Result<(), WizardError> {
    if let RepositoryIdentity::AzureRepos {
        organization,
        project,
        repository,
    } = identity
    {
        let remote = ctx
            .projects
            .repository(organization, project, repository)
            .await
            .map_err(WizardError::remote(STEP, "Look up repository"))?;
        debug!(repository_id = %remote.id, project = %remote.project.name, "Found Azure Repos repository");

        inputs.is_new_organization = false;
        inputs.organization_name = Some(organization.clone());
        inputs.project = Some(RemoteProject {
            id: remote.project.id,
            name: remote.project.name,
        });
        inputs.remote_repository_id = Some(remote.id);
        return Ok(());
    }

    inputs.is_new_organization = false;
    let organizations = ctx
        .projects
        .organizations(inputs.azure_session.as_ref())
        .await
        .map_err(WizardError::remote(STEP, "List organizations"))?;

    if organizations.is_empty() {
        return name_new_organization(ctx, identity.repository_name(), inputs).await;
    }

    let options = organizations
        .into_iter()
        .map(|o| (ChoiceItem::new(o.name.clone()), o))
        .collect();
    let organization = choose(
        ctx.prompt.as_ref(),
        &ChoiceRequest::new("Select an Azure DevOps organization", "Organization"),
        STEP,
        "List organizations",
        ready(options),
        || WizardError::UserCancelled,
    )
    .await?;

    let client = ctx.projects.clone();
    let organization_name = organization.name.clone();
    let projects: ValuedOptions<'_, RemoteProject> = async move {
        let projects = client.projects(&organization_name).await?;
        let mut options: Vec<(ChoiceItem, RemoteProject)> = projects
            .into_iter()
            .map(|p| {
                let project = RemoteProject {
                    id: p.id,
                    name: p.name,
                };
                (ChoiceItem::new(project.name.clone()), project)
            })
            .collect();
        if options.is_empty() {
            // empty id: created with the other prerequisites
            options.push((
                ChoiceItem::new(NEW_ORGANIZATION_PROJECT).with_description("new project"),
                RemoteProject {
                    id: String::new(),
                    name: NEW_ORGANIZATION_PROJECT.to_string(),
                },
            ));
        }
        Ok::<_, anyhow::Error>(options)
    }
    .boxed();
    let project = choose(
        ctx.prompt.as_ref(),
        &ChoiceRequest::new("Select an Azure DevOps project", "Project"),
        STEP,
        "List projects",
        projects,
        || WizardError::UserCancelled,
    )
    .await?;

    info!(organization = %organization.name, project = %project.name, "Selected remote project");
    inputs.organization_name = Some(organization.name);
    inputs.project = Some(project);
    Ok(())
}

async fn name_new_organization(
    ctx: &WizardContext,
    repository_name: &str,
    inputs: &mut WizardInputs,
) -> Result<(), WizardError> {
    inputs.is_new_organization = true;

    let user = inputs
        .azure_session
        .as_ref()
        .map(|s| s.user_local_part().to_string())
        .unwrap_or_default();
    let mut name = derive_organization_name(&user, repository_name);
    debug!(candidate = %name, "Derived organization name");

    loop {
        let reason = match ensure_organization_name(ctx.projects.as_ref(), &name).await {
            Ok(()) => break,
            Err(WizardError::InvalidOrganizationName { reason, .. }) => reason,
            Err(other) => return Err(other),
        };

        let request = TextRequest {
            title: "Name the new Azure DevOps organization".to_string(),
            placeholder: "Organization name".to_string(),
            initial_value: Some(name.clone()),
            validation_message: Some(reason),
        };
        name = ctx
            .prompt
            .text_input(&request)
            .await
            .map_err(WizardError::remote(STEP, "Read organization name"))?
            .ok_or(WizardError::UserCancelled)?;
    }

    info!(organization = %name, "Using new organization");
    ctx.telemetry.record_fact("newOrganization", "true");
    inputs.organization_name = Some(name);
    inputs.project = Some(RemoteProject {
        id: String::new(),
        name: NEW_ORGANIZATION_PROJECT.to_string(),
    });
    Ok(())
}
