//! Connect routing profile data source
//!
//! Resolution accepts either `routing_profile_id` or `name`. Name lookup
//! walks every `ListRoutingProfiles` page and keeps the last summary whose
//! name matches. Queue configurations come from the separate
//! `ListRoutingProfileQueues` API.

use std::collections::HashMap;

use aws_sdk_connect::Client;
use aws_sdk_connect::types::{
    MediaConcurrency, RoutingProfileQueueConfigSummary, RoutingProfileSummary,
};
use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::resource::{Resource, State, Value};
use stratus_core::tags::{IgnoreTagsConfig, KeyValueTags};

use super::{
    LIST_ROUTING_PROFILE_QUEUES_MAX_RESULTS, LIST_ROUTING_PROFILES_MAX_RESULTS, encode_id,
};

pub(crate) async fn read_data_source(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    resource: &Resource,
) -> ProviderResult<State> {
    let id = resource.id.clone();

    let instance_id = resource
        .string_attr("instance_id")
        .ok_or_else(|| ProviderError::new("instance_id is required").for_resource(id.clone()))?;

    let routing_profile_id = match resource.string_attr("routing_profile_id") {
        Some(v) => v.to_string(),
        None => {
            let name = resource.string_attr("name").ok_or_else(|| {
                ProviderError::new("either routing_profile_id or name must be set")
                    .for_resource(id.clone())
            })?;

            let summary = summary_by_name(client, instance_id, name)
                .await
                .map_err(|e| e.for_resource(id.clone()))?
                .ok_or_else(|| {
                    ProviderError::new(format!(
                        "finding Connect Routing Profile by name ({}): not found",
                        name
                    ))
                    .for_resource(id.clone())
                })?;

            summary.id().unwrap_or_default().to_string()
        }
    };

    let resp = client
        .describe_routing_profile()
        .instance_id(instance_id)
        .routing_profile_id(&routing_profile_id)
        .send()
        .await
        .map_err(|e| {
            ProviderError::wrap("getting Connect Routing Profile", e).for_resource(id.clone())
        })?;

    let routing_profile = resp.routing_profile().ok_or_else(|| {
        ProviderError::new("getting Connect Routing Profile: empty response")
            .for_resource(id.clone())
    })?;

    let mut attributes = HashMap::new();
    attributes.insert(
        "instance_id".to_string(),
        Value::String(instance_id.to_string()),
    );
    if let Some(arn) = routing_profile.routing_profile_arn() {
        attributes.insert("arn".to_string(), Value::String(arn.to_string()));
    }
    if let Some(queue_id) = routing_profile.default_outbound_queue_id() {
        attributes.insert(
            "default_outbound_queue_id".to_string(),
            Value::String(queue_id.to_string()),
        );
    }
    if let Some(description) = routing_profile.description() {
        attributes.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
    }
    if let Some(name) = routing_profile.name() {
        attributes.insert("name".to_string(), Value::String(name.to_string()));
    }
    attributes.insert(
        "routing_profile_id".to_string(),
        Value::String(routing_profile_id.clone()),
    );
    attributes.insert(
        "media_concurrencies".to_string(),
        flatten_media_concurrencies(routing_profile.media_concurrencies()),
    );

    // Queue configurations are not part of DescribeRoutingProfile
    let configs = queue_configs(client, instance_id, &routing_profile_id)
        .await
        .map_err(|e| e.for_resource(id.clone()))?;
    attributes.insert("queue_configs".to_string(), flatten_queue_configs(&configs));

    if let Some(tags) = routing_profile.tags() {
        attributes.insert(
            "tags".to_string(),
            KeyValueTags::from_map(tags)
                .ignore_aws()
                .ignore_config(ignore_tags)
                .to_value(),
        );
    }

    Ok(State::existing(id, attributes)
        .with_identifier(encode_id(instance_id, &routing_profile_id)))
}

/// Paginated lookup by name; the last matching summary wins
async fn summary_by_name(
    client: &Client,
    instance_id: &str,
    name: &str,
) -> ProviderResult<Option<RoutingProfileSummary>> {
    log::debug!("looking up Connect routing profile by name: {}", name);

    let mut result = None;
    let mut pages = client
        .list_routing_profiles()
        .instance_id(instance_id)
        .max_results(LIST_ROUTING_PROFILES_MAX_RESULTS)
        .into_paginator()
        .send();

    while let Some(page) = pages.next().await {
        let page =
            page.map_err(|e| ProviderError::wrap("listing Connect Routing Profiles", e))?;
        for summary in page.routing_profile_summary_list() {
            if summary.name() == Some(name) {
                result = Some(summary.clone());
            }
        }
    }

    Ok(result)
}

async fn queue_configs(
    client: &Client,
    instance_id: &str,
    routing_profile_id: &str,
) -> ProviderResult<Vec<RoutingProfileQueueConfigSummary>> {
    client
        .list_routing_profile_queues()
        .instance_id(instance_id)
        .routing_profile_id(routing_profile_id)
        .max_results(LIST_ROUTING_PROFILE_QUEUES_MAX_RESULTS)
        .into_paginator()
        .items()
        .send()
        .collect::<Result<Vec<_>, _>>()
        .await
        .map_err(|e| ProviderError::wrap("listing Connect Routing Profile queues", e))
}

fn flatten_media_concurrencies(media_concurrencies: &[MediaConcurrency]) -> Value {
    Value::List(
        media_concurrencies
            .iter()
            .map(|mc| {
                let mut entry = HashMap::new();
                entry.insert(
                    "channel".to_string(),
                    Value::String(mc.channel().as_str().to_string()),
                );
                entry.insert("concurrency".to_string(), Value::Int(mc.concurrency() as i64));
                Value::Map(entry)
            })
            .collect(),
    )
}

fn flatten_queue_configs(configs: &[RoutingProfileQueueConfigSummary]) -> Value {
    Value::List(
        configs
            .iter()
            .map(|config| {
                let mut entry = HashMap::new();
                entry.insert(
                    "channel".to_string(),
                    Value::String(config.channel().as_str().to_string()),
                );
                entry.insert("delay".to_string(), Value::Int(config.delay() as i64));
                entry.insert("priority".to_string(), Value::Int(config.priority() as i64));
                entry.insert(
                    "queue_arn".to_string(),
                    Value::String(config.queue_arn().to_string()),
                );
                entry.insert(
                    "queue_id".to_string(),
                    Value::String(config.queue_id().to_string()),
                );
                entry.insert(
                    "queue_name".to_string(),
                    Value::String(config.queue_name().to_string()),
                );
                Value::Map(entry)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_connect::types::Channel;

    #[test]
    fn flatten_media_concurrencies_projects_channel_and_concurrency() {
        let media = vec![
            MediaConcurrency::builder()
                .channel(Channel::Voice)
                .concurrency(1)
                .build()
                .unwrap(),
            MediaConcurrency::builder()
                .channel(Channel::Chat)
                .concurrency(3)
                .build()
                .unwrap(),
        ];

        let value = flatten_media_concurrencies(&media);
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 2);

        let first = items[0].as_map().unwrap();
        assert_eq!(first.get("channel"), Some(&Value::String("VOICE".to_string())));
        assert_eq!(first.get("concurrency"), Some(&Value::Int(1)));

        let second = items[1].as_map().unwrap();
        assert_eq!(second.get("channel"), Some(&Value::String("CHAT".to_string())));
        assert_eq!(second.get("concurrency"), Some(&Value::Int(3)));
    }

    #[test]
    fn flatten_queue_configs_projects_every_field() {
        let configs = vec![
            RoutingProfileQueueConfigSummary::builder()
                .queue_id("queue-1")
                .queue_arn("arn:aws:connect:us-east-1:123456789012:instance/i-1/queue/queue-1")
                .queue_name("support")
                .priority(1)
                .delay(0)
                .channel(Channel::Voice)
                .build()
                .unwrap(),
        ];

        let value = flatten_queue_configs(&configs);
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 1);

        let entry = items[0].as_map().unwrap();
        assert_eq!(entry.get("queue_id"), Some(&Value::String("queue-1".to_string())));
        assert_eq!(
            entry.get("queue_name"),
            Some(&Value::String("support".to_string()))
        );
        assert_eq!(entry.get("priority"), Some(&Value::Int(1)));
        assert_eq!(entry.get("delay"), Some(&Value::Int(0)));
        assert_eq!(entry.get("channel"), Some(&Value::String("VOICE".to_string())));
    }

    #[test]
    fn flatten_empty_lists() {
        assert_eq!(flatten_media_concurrencies(&[]), Value::List(vec![]));
        assert_eq!(flatten_queue_configs(&[]), Value::List(vec![]));
    }
}
