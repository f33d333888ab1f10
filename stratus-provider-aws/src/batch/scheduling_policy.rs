//! Batch scheduling policy resource and data source

use std::collections::HashMap;

use aws_sdk_batch::Client;
use aws_sdk_batch::types::{FairsharePolicy, SchedulingPolicyDetail};
use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::resource::{Resource, ResourceId, State, Value};
use stratus_core::tags::{IgnoreTagsConfig, KeyValueTags};

use super::update_tags;

pub(crate) async fn read_data_source(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    resource: &Resource,
) -> ProviderResult<State> {
    let id = resource.id.clone();

    let arn = resource
        .string_attr("arn")
        .ok_or_else(|| ProviderError::new("arn is required").for_resource(id.clone()))?;

    let detail = describe(client, arn)
        .await
        .map_err(|e| e.for_resource(id.clone()))?
        .ok_or_else(|| {
            ProviderError::new(format!("Batch Scheduling Policy ({}) not found", arn))
                .for_resource(id.clone())
        })?;

    Ok(policy_state(id, &detail, ignore_tags))
}

/// Read by ARN; an empty describe response maps to `State::not_found`
pub(crate) async fn read(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<State> {
    match describe(client, identifier)
        .await
        .map_err(|e| e.for_resource(id.clone()))?
    {
        Some(detail) => Ok(policy_state(id.clone(), &detail, ignore_tags)),
        None => Ok(State::not_found(id.clone())),
    }
}

pub(crate) async fn create(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    resource: &Resource,
) -> ProviderResult<State> {
    let id = resource.id.clone();

    let name = resource
        .string_attr("name")
        .ok_or_else(|| ProviderError::new("name is required").for_resource(id.clone()))?;

    let mut req = client
        .create_scheduling_policy()
        .name(name)
        .set_fairshare_policy(expand_fair_share_policy(resource));

    if let Some(tags) = resource.attributes.get("tags") {
        let tags = KeyValueTags::from_value(tags);
        if !tags.is_empty() {
            req = req.set_tags(Some(tags.map()));
        }
    }

    let out = req.send().await.map_err(|e| {
        ProviderError::wrap("creating Batch Scheduling Policy", e).for_resource(id.clone())
    })?;

    let arn = out.arn().unwrap_or_default().to_string();
    read(client, ignore_tags, &id, &arn).await
}

pub(crate) async fn update(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    id: &ResourceId,
    identifier: &str,
    from: &State,
    to: &Resource,
) -> ProviderResult<State> {
    client
        .update_scheduling_policy()
        .arn(identifier)
        .set_fairshare_policy(expand_fair_share_policy(to))
        .send()
        .await
        .map_err(|e| {
            ProviderError::wrap("updating Batch Scheduling Policy", e).for_resource(id.clone())
        })?;

    let current = from
        .map_attr("tags")
        .map(|m| KeyValueTags::from_value(&Value::Map(m.clone())))
        .unwrap_or_default();
    let desired = to
        .attributes
        .get("tags")
        .map(KeyValueTags::from_value)
        .unwrap_or_default();
    update_tags(client, identifier, &current, &desired)
        .await
        .map_err(|e| e.for_resource(id.clone()))?;

    read(client, ignore_tags, id, identifier).await
}

pub(crate) async fn delete(
    client: &Client,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<()> {
    client
        .delete_scheduling_policy()
        .arn(identifier)
        .send()
        .await
        .map_err(|e| {
            ProviderError::wrap("deleting Batch Scheduling Policy", e).for_resource(id.clone())
        })?;

    Ok(())
}

async fn describe(client: &Client, arn: &str) -> ProviderResult<Option<SchedulingPolicyDetail>> {
    let resp = client
        .describe_scheduling_policies()
        .arns(arn)
        .send()
        .await
        .map_err(|e| ProviderError::wrap("getting Batch Scheduling Policy", e))?;

    Ok(resp.scheduling_policies().first().cloned())
}

/// Build the fair-share policy from the `fair_share_policy` block, if set
fn expand_fair_share_policy(resource: &Resource) -> Option<FairsharePolicy> {
    let block = resource.map_attr("fair_share_policy")?;

    let mut builder = FairsharePolicy::builder();
    if let Some(seconds) = block.get("share_decay_seconds").and_then(Value::as_int) {
        builder = builder.share_decay_seconds(seconds as i32);
    }
    if let Some(reservation) = block.get("compute_reservation").and_then(Value::as_int) {
        builder = builder.compute_reservation(reservation as i32);
    }
    Some(builder.build())
}

fn flatten_fair_share_policy(policy: &FairsharePolicy) -> Value {
    let mut block = HashMap::new();
    if let Some(seconds) = policy.share_decay_seconds() {
        block.insert("share_decay_seconds".to_string(), Value::Int(seconds as i64));
    }
    if let Some(reservation) = policy.compute_reservation() {
        block.insert("compute_reservation".to_string(), Value::Int(reservation as i64));
    }
    Value::Map(block)
}

fn policy_state(
    id: ResourceId,
    detail: &SchedulingPolicyDetail,
    ignore_tags: &IgnoreTagsConfig,
) -> State {
    let mut attributes = HashMap::new();
    attributes.insert(
        "name".to_string(),
        Value::String(detail.name().unwrap_or_default().to_string()),
    );
    attributes.insert(
        "arn".to_string(),
        Value::String(detail.arn().unwrap_or_default().to_string()),
    );
    if let Some(policy) = detail.fairshare_policy() {
        attributes.insert(
            "fair_share_policy".to_string(),
            flatten_fair_share_policy(policy),
        );
    }
    if let Some(tags) = detail.tags() {
        attributes.insert(
            "tags".to_string(),
            KeyValueTags::from_map(tags)
                .ignore_aws()
                .ignore_config(ignore_tags)
                .to_value(),
        );
    }

    let identifier = detail.arn().unwrap_or_default().to_string();
    State::existing(id, attributes).with_identifier(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_fair_share_policy_projects_block() {
        let mut block = HashMap::new();
        block.insert("share_decay_seconds".to_string(), Value::Int(3600));
        block.insert("compute_reservation".to_string(), Value::Int(10));
        let resource = Resource::new("batch.scheduling_policy", "fair")
            .with_attribute("fair_share_policy", Value::Map(block));

        let policy = expand_fair_share_policy(&resource).unwrap();
        assert_eq!(policy.share_decay_seconds(), Some(3600));
        assert_eq!(policy.compute_reservation(), Some(10));
    }

    #[test]
    fn expand_without_block_is_none() {
        let resource = Resource::new("batch.scheduling_policy", "fair");
        assert!(expand_fair_share_policy(&resource).is_none());
    }

    #[test]
    fn flatten_fair_share_policy_skips_absent_fields() {
        let policy = FairsharePolicy::builder().share_decay_seconds(600).build();

        let value = flatten_fair_share_policy(&policy);
        let block = value.as_map().unwrap();
        assert_eq!(block.get("share_decay_seconds"), Some(&Value::Int(600)));
        assert!(!block.contains_key("compute_reservation"));
    }

    #[test]
    fn policy_state_projects_detail() {
        let detail = SchedulingPolicyDetail::builder()
            .name("fair")
            .arn("arn:aws:batch:us-east-1:123456789012:scheduling-policy/fair")
            .fairshare_policy(FairsharePolicy::builder().compute_reservation(5).build())
            .tags("Team", "data")
            .build();

        let state = policy_state(
            ResourceId::new("batch.scheduling_policy", "fair"),
            &detail,
            &IgnoreTagsConfig::default(),
        );

        assert!(state.exists);
        assert_eq!(
            state.identifier.as_deref(),
            Some("arn:aws:batch:us-east-1:123456789012:scheduling-policy/fair")
        );
        assert_eq!(state.string_attr("name"), Some("fair"));

        let block = state.map_attr("fair_share_policy").unwrap();
        assert_eq!(block.get("compute_reservation"), Some(&Value::Int(5)));
    }
}
