//! Batch compute environment data source

use std::collections::HashMap;

use aws_sdk_batch::Client;
use aws_sdk_batch::types::ComputeEnvironmentDetail;
use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::resource::{Resource, ResourceId, State, Value};
use stratus_core::tags::{IgnoreTagsConfig, KeyValueTags};

pub(crate) async fn read_data_source(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    resource: &Resource,
) -> ProviderResult<State> {
    let id = resource.id.clone();

    let name = resource.string_attr("compute_environment_name").ok_or_else(|| {
        ProviderError::new("compute_environment_name is required").for_resource(id.clone())
    })?;

    let resp = client
        .describe_compute_environments()
        .compute_environments(name)
        .send()
        .await
        .map_err(|e| {
            ProviderError::wrap("getting Batch Compute Environment", e).for_resource(id.clone())
        })?;

    let environments = resp.compute_environments();
    if environments.len() > 1 {
        return Err(ProviderError::new(format!(
            "multiple Batch Compute Environments matched name ({})",
            name
        ))
        .for_resource(id));
    }
    let detail = environments.first().ok_or_else(|| {
        ProviderError::new(format!(
            "Batch Compute Environment ({}) not found",
            name
        ))
        .for_resource(id.clone())
    })?;

    Ok(environment_state(id, detail, ignore_tags))
}

fn environment_state(
    id: ResourceId,
    detail: &ComputeEnvironmentDetail,
    ignore_tags: &IgnoreTagsConfig,
) -> State {
    let mut attributes = HashMap::new();
    attributes.insert(
        "compute_environment_name".to_string(),
        Value::String(detail.compute_environment_name().unwrap_or_default().to_string()),
    );
    attributes.insert(
        "arn".to_string(),
        Value::String(detail.compute_environment_arn().unwrap_or_default().to_string()),
    );
    if let Some(cluster_arn) = detail.ecs_cluster_arn() {
        attributes.insert(
            "ecs_cluster_arn".to_string(),
            Value::String(cluster_arn.to_string()),
        );
    }
    if let Some(service_role) = detail.service_role() {
        attributes.insert(
            "service_role".to_string(),
            Value::String(service_role.to_string()),
        );
    }
    if let Some(ce_type) = detail.r#type() {
        attributes.insert("type".to_string(), Value::String(ce_type.as_str().to_string()));
    }
    if let Some(state) = detail.state() {
        attributes.insert("state".to_string(), Value::String(state.as_str().to_string()));
    }
    if let Some(status) = detail.status() {
        attributes.insert("status".to_string(), Value::String(status.as_str().to_string()));
    }
    if let Some(reason) = detail.status_reason() {
        attributes.insert("status_reason".to_string(), Value::String(reason.to_string()));
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

    let identifier = detail.compute_environment_arn().unwrap_or_default().to_string();
    State::existing(id, attributes).with_identifier(identifier)
}
