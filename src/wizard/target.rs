use super::choose::{choose, ValuedOptions};
use super::context::WizardContext;
use super::error::WizardError;
use super::step::WizardStep;
use crate::model::{AzureResource, PipelineTemplate, Subscription, TargetType, WizardInputs};
use crate::prompt::{ChoiceItem, ChoiceRequest};
use futures_util::FutureExt;
use tracing::info;

const STEP: WizardStep = WizardStep::ResolveTarget;

/// Picks a subscription and, for web-app templates, the resource to deploy to.
///
/// Writes `target_resource` and `azure_session`. Callers skip this stage when
/// the target is already known.
pub(crate) async fn resolve_target_resource(
    ctx: &WizardContext,
    template: &PipelineTemplate,
    inputs: &mut WizardInputs,
) -> Result<(), WizardError> {
    let sessions = ctx.sessions.clone();
    let subscriptions: ValuedOptions<'_, Subscription> = async move {
        let subscriptions = sessions.current_subscriptions().await?;
        Ok::<_, anyhow::Error>(
            subscriptions
                .into_iter()
                .map(|s| {
                    let item = ChoiceItem::new(s.name.clone()).with_description(s.id.clone());
                    (item, s)
                })
                .collect::<Vec<_>>(),
        )
    }
    .boxed();
    let subscription = choose(
        ctx.prompt.as_ref(),
        &ChoiceRequest::new("Select an Azure subscription", "Subscription"),
        STEP,
        "List subscriptions",
        subscriptions,
        || WizardError::NoSubscriptions,
    )
    .await?;

    let session = ctx
        .sessions
        .session_for(&subscription.id)
        .await
        .map_err(WizardError::remote(STEP, "Open subscription session"))?;
    inputs.target_resource.subscription_id = Some(subscription.id.clone());
    ctx.telemetry.record_fact("subscriptionId", subscription.id.clone());

    if template.target_type == TargetType::None {
        info!(subscription = %subscription.id, "Template needs no deployment target");
        inputs.azure_session = Some(session);
        return Ok(());
    }

    let kind = template.effective_target_kind();
    let targets = ctx.targets.clone();
    let listing_session = session.clone();
    let resources: ValuedOptions<'_, AzureResource> = async move {
        let resources = targets.list(&listing_session, kind).await?;
        Ok::<_, anyhow::Error>(
            resources
                .into_iter()
                .map(|r| {
                    let mut item = ChoiceItem::new(r.name.clone());
                    if !r.location.is_empty() {
                        item = item.with_description(r.location.clone());
                    }
                    (item, r)
                })
                .collect::<Vec<_>>(),
        )
    }
    .boxed();
    let subscription_id = subscription.id.clone();
    let resource = choose(
        ctx.prompt.as_ref(),
        &ChoiceRequest::new("Select the web app to deploy to", kind.as_str()),
        STEP,
        "List resources",
        resources,
        move || WizardError::NoTargetResources {
            kind,
            subscription: subscription_id,
        },
    )
    .await?;

    info!(resource = %resource.name, kind = %kind, "Selected deployment target");
    inputs.target_resource.resource = Some(resource);
    inputs.azure_session = Some(session);
    Ok(())
}
