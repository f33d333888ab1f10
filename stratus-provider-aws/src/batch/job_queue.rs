//! Batch job queue resource and data source
//!
//! Job queues transition through CREATING/UPDATING before settling on
//! VALID or INVALID, and must be DISABLED before they can be deleted.
//! Mutating operations poll until the queue settles.

use std::collections::HashMap;

use aws_sdk_batch::Client;
use aws_sdk_batch::types::{ComputeEnvironmentOrder, JobQueueDetail, JqState, JqStatus};
use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::resource::{Resource, ResourceId, State, Value};
use stratus_core::tags::{IgnoreTagsConfig, KeyValueTags};

use super::{WAIT_DELAY, WAIT_MAX_ATTEMPTS, update_tags};

pub(crate) async fn read_data_source(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    resource: &Resource,
) -> ProviderResult<State> {
    let id = resource.id.clone();

    let name = resource
        .string_attr("name")
        .ok_or_else(|| ProviderError::new("name is required").for_resource(id.clone()))?;

    let detail = describe(client, name)
        .await
        .map_err(|e| e.for_resource(id.clone()))?
        .ok_or_else(|| {
            ProviderError::new(format!("Batch Job Queue ({}) not found", name))
                .for_resource(id.clone())
        })?;

    Ok(queue_state(id, &detail, ignore_tags))
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
        Some(detail) => Ok(queue_state(id.clone(), &detail, ignore_tags)),
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
    let priority = resource
        .int_attr("priority")
        .ok_or_else(|| ProviderError::new("priority is required").for_resource(id.clone()))?;
    let state = resource.string_attr("state").unwrap_or("ENABLED");
    let order = expand_compute_environment_order(resource)
        .map_err(|e| e.for_resource(id.clone()))?;

    let mut req = client
        .create_job_queue()
        .job_queue_name(name)
        .priority(priority as i32)
        .state(JqState::from(state))
        .set_compute_environment_order(Some(order));

    if let Some(policy_arn) = resource.string_attr("scheduling_policy_arn") {
        req = req.scheduling_policy_arn(policy_arn);
    }

    if let Some(tags) = resource.attributes.get("tags") {
        let tags = KeyValueTags::from_value(tags);
        if !tags.is_empty() {
            req = req.set_tags(Some(tags.map()));
        }
    }

    let out = req.send().await.map_err(|e| {
        ProviderError::wrap("creating Batch Job Queue", e).for_resource(id.clone())
    })?;

    let arn = out.job_queue_arn().unwrap_or_default().to_string();
    wait_until_settled(client, &arn)
        .await
        .map_err(|e| e.for_resource(id.clone()))?;

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
    let priority = to
        .int_attr("priority")
        .ok_or_else(|| ProviderError::new("priority is required").for_resource(id.clone()))?;
    let state = to.string_attr("state").unwrap_or("ENABLED");
    let order =
        expand_compute_environment_order(to).map_err(|e| e.for_resource(id.clone()))?;

    client
        .update_job_queue()
        .job_queue(identifier)
        .priority(priority as i32)
        .state(JqState::from(state))
        .set_compute_environment_order(Some(order))
        .set_scheduling_policy_arn(
            to.string_attr("scheduling_policy_arn").map(str::to_string),
        )
        .send()
        .await
        .map_err(|e| {
            ProviderError::wrap("updating Batch Job Queue", e).for_resource(id.clone())
        })?;

    wait_until_settled(client, identifier)
        .await
        .map_err(|e| e.for_resource(id.clone()))?;

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
    let detail = match describe(client, identifier)
        .await
        .map_err(|e| e.for_resource(id.clone()))?
    {
        Some(detail) => detail,
        None => return Ok(()),
    };

    // A queue must be disabled before DeleteJobQueue is accepted
    if detail.state() == Some(&JqState::Enabled) {
        client
            .update_job_queue()
            .job_queue(identifier)
            .state(JqState::Disabled)
            .send()
            .await
            .map_err(|e| {
                ProviderError::wrap("disabling Batch Job Queue", e).for_resource(id.clone())
            })?;
        wait_until_settled(client, identifier)
            .await
            .map_err(|e| e.for_resource(id.clone()))?;
    }

    client
        .delete_job_queue()
        .job_queue(identifier)
        .send()
        .await
        .map_err(|e| {
            ProviderError::wrap("deleting Batch Job Queue", e).for_resource(id.clone())
        })?;

    wait_until_deleted(client, identifier)
        .await
        .map_err(|e| e.for_resource(id.clone()))
}

async fn describe(client: &Client, queue: &str) -> ProviderResult<Option<JobQueueDetail>> {
    let resp = client
        .describe_job_queues()
        .job_queues(queue)
        .send()
        .await
        .map_err(|e| ProviderError::wrap("getting Batch Job Queue", e))?;

    Ok(resp.job_queues().first().cloned())
}

/// Poll until the queue reports VALID; INVALID is terminal and fails
async fn wait_until_settled(client: &Client, queue: &str) -> ProviderResult<()> {
    for attempt in 0..WAIT_MAX_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(WAIT_DELAY).await;
        }

        let detail = describe(client, queue).await?.ok_or_else(|| {
            ProviderError::new(format!(
                "waiting for Batch Job Queue ({}): queue disappeared",
                queue
            ))
        })?;

        match detail.status() {
            Some(JqStatus::Valid) => return Ok(()),
            Some(JqStatus::Invalid) => {
                return Err(ProviderError::new(format!(
                    "Batch Job Queue ({}) is INVALID: {}",
                    queue,
                    detail.status_reason().unwrap_or("no reason reported")
                )));
            }
            status => {
                log::debug!(
                    "Batch Job Queue ({}) status {:?}, waiting",
                    queue,
                    status.map(|s| s.as_str())
                );
            }
        }
    }

    Err(ProviderError::new(format!(
        "timed out waiting for Batch Job Queue ({}) to become VALID",
        queue
    )))
}

async fn wait_until_deleted(client: &Client, queue: &str) -> ProviderResult<()> {
    for attempt in 0..WAIT_MAX_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(WAIT_DELAY).await;
        }

        match describe(client, queue).await? {
            None => return Ok(()),
            Some(detail) if detail.status() == Some(&JqStatus::Deleted) => return Ok(()),
            Some(detail) => {
                log::debug!(
                    "Batch Job Queue ({}) status {:?}, waiting for deletion",
                    queue,
                    detail.status().map(|s| s.as_str())
                );
            }
        }
    }

    Err(ProviderError::new(format!(
        "timed out waiting for Batch Job Queue ({}) to be deleted",
        queue
    )))
}

fn expand_compute_environment_order(
    resource: &Resource,
) -> ProviderResult<Vec<ComputeEnvironmentOrder>> {
    let items = resource
        .list_attr("compute_environment_order")
        .ok_or_else(|| ProviderError::new("compute_environment_order is required"))?;

    items
        .iter()
        .map(|item| {
            let entry = item.as_map().ok_or_else(|| {
                ProviderError::new("compute_environment_order entries must be objects")
            })?;
            let order = entry.get("order").and_then(Value::as_int).ok_or_else(|| {
                ProviderError::new("compute_environment_order entries need an order")
            })?;
            let environment = entry
                .get("compute_environment")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ProviderError::new(
                        "compute_environment_order entries need a compute_environment",
                    )
                })?;

            Ok(ComputeEnvironmentOrder::builder()
                .order(order as i32)
                .compute_environment(environment)
                .build())
        })
        .collect()
}

fn flatten_compute_environment_order(order: &[ComputeEnvironmentOrder]) -> Value {
    Value::List(
        order
            .iter()
            .map(|entry| {
                let mut item = HashMap::new();
                item.insert(
                    "order".to_string(),
                    Value::Int(entry.order().unwrap_or_default() as i64),
                );
                item.insert(
                    "compute_environment".to_string(),
                    Value::String(entry.compute_environment().unwrap_or_default().to_string()),
                );
                Value::Map(item)
            })
            .collect(),
    )
}

fn queue_state(id: ResourceId, detail: &JobQueueDetail, ignore_tags: &IgnoreTagsConfig) -> State {
    let mut attributes = HashMap::new();
    attributes.insert(
        "name".to_string(),
        Value::String(detail.job_queue_name().unwrap_or_default().to_string()),
    );
    attributes.insert(
        "arn".to_string(),
        Value::String(detail.job_queue_arn().unwrap_or_default().to_string()),
    );
    attributes.insert(
        "priority".to_string(),
        Value::Int(detail.priority().unwrap_or_default() as i64),
    );
    attributes.insert(
        "state".to_string(),
        Value::String(detail.state().map(|s| s.as_str()).unwrap_or_default().to_string()),
    );
    attributes.insert(
        "compute_environment_order".to_string(),
        flatten_compute_environment_order(detail.compute_environment_order()),
    );
    if let Some(status) = detail.status() {
        attributes.insert("status".to_string(), Value::String(status.as_str().to_string()));
    }
    if let Some(reason) = detail.status_reason() {
        attributes.insert("status_reason".to_string(), Value::String(reason.to_string()));
    }
    if let Some(policy_arn) = detail.scheduling_policy_arn() {
        attributes.insert(
            "scheduling_policy_arn".to_string(),
            Value::String(policy_arn.to_string()),
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

    let identifier = detail.job_queue_arn().unwrap_or_default().to_string();
    State::existing(id, attributes).with_identifier(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_value(order: i64, environment: &str) -> Value {
        let mut entry = HashMap::new();
        entry.insert("order".to_string(), Value::Int(order));
        entry.insert(
            "compute_environment".to_string(),
            Value::String(environment.to_string()),
        );
        Value::Map(entry)
    }

    #[test]
    fn expand_compute_environment_order_builds_sdk_values() {
        let resource = Resource::new("batch.job_queue", "main").with_attribute(
            "compute_environment_order",
            Value::List(vec![
                order_value(1, "arn:aws:batch:us-east-1:123456789012:compute-environment/a"),
                order_value(2, "arn:aws:batch:us-east-1:123456789012:compute-environment/b"),
            ]),
        );

        let order = expand_compute_environment_order(&resource).unwrap();
        assert_eq!(order.len(), 2);
        assert_eq!(order[0].order(), Some(1));
        assert_eq!(
            order[1].compute_environment(),
            Some("arn:aws:batch:us-east-1:123456789012:compute-environment/b")
        );
    }

    #[test]
    fn expand_rejects_missing_fields() {
        let mut entry = HashMap::new();
        entry.insert("order".to_string(), Value::Int(1));
        let resource = Resource::new("batch.job_queue", "main")
            .with_attribute("compute_environment_order", Value::List(vec![Value::Map(entry)]));

        assert!(expand_compute_environment_order(&resource).is_err());
    }

    #[test]
    fn flatten_round_trips_expand() {
        let order = vec![
            ComputeEnvironmentOrder::builder()
                .order(1)
                .compute_environment("arn:aws:batch:us-east-1:123456789012:compute-environment/a")
                .build(),
        ];

        let value = flatten_compute_environment_order(&order);
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 1);

        let entry = items[0].as_map().unwrap();
        assert_eq!(entry.get("order"), Some(&Value::Int(1)));
        assert_eq!(
            entry.get("compute_environment"),
            Some(&Value::String(
                "arn:aws:batch:us-east-1:123456789012:compute-environment/a".to_string()
            ))
        );
    }

    #[test]
    fn queue_state_projects_detail() {
        let detail = JobQueueDetail::builder()
            .job_queue_name("main")
            .job_queue_arn("arn:aws:batch:us-east-1:123456789012:job-queue/main")
            .priority(10)
            .state(JqState::Enabled)
            .status(JqStatus::Valid)
            .compute_environment_order(
                ComputeEnvironmentOrder::builder()
                    .order(1)
                    .compute_environment(
                        "arn:aws:batch:us-east-1:123456789012:compute-environment/a",
                    )
                    .build(),
            )
            .build();

        let state = queue_state(
            ResourceId::new("batch.job_queue", "main"),
            &detail,
            &IgnoreTagsConfig::default(),
        );

        assert!(state.exists);
        assert_eq!(
            state.identifier.as_deref(),
            Some("arn:aws:batch:us-east-1:123456789012:job-queue/main")
        );
        assert_eq!(state.string_attr("name"), Some("main"));
        assert_eq!(state.int_attr("priority"), Some(10));
        assert_eq!(state.string_attr("state"), Some("ENABLED"));
        assert_eq!(state.string_attr("status"), Some("VALID"));
    }
}
