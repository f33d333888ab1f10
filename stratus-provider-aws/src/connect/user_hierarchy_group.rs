//! Connect user hierarchy group resource and data source
//!
//! `DescribeUserHierarchyGroup` does not return the parent group, so
//! `parent_group_id` is accepted at create time but never read back.

use std::collections::HashMap;

use aws_sdk_connect::Client;
use aws_sdk_connect::types::{HierarchyGroup, HierarchyGroupSummary, HierarchyPath};
use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::resource::{Resource, ResourceId, State, Value};
use stratus_core::tags::{IgnoreTagsConfig, KeyValueTags};

use super::{
    LIST_USER_HIERARCHY_GROUPS_MAX_RESULTS, encode_id, is_resource_not_found, parse_id,
    update_tags,
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

    let hierarchy_group_id = match resource.string_attr("hierarchy_group_id") {
        Some(v) => v.to_string(),
        None => {
            let name = resource.string_attr("name").ok_or_else(|| {
                ProviderError::new("either hierarchy_group_id or name must be set")
                    .for_resource(id.clone())
            })?;

            let summary = summary_by_name(client, instance_id, name)
                .await
                .map_err(|e| e.for_resource(id.clone()))?
                .ok_or_else(|| {
                    ProviderError::new(format!(
                        "finding Connect Hierarchy Group by name ({}): not found",
                        name
                    ))
                    .for_resource(id.clone())
                })?;

            summary.id().unwrap_or_default().to_string()
        }
    };

    let resp = client
        .describe_user_hierarchy_group()
        .instance_id(instance_id)
        .hierarchy_group_id(&hierarchy_group_id)
        .send()
        .await
        .map_err(|e| {
            ProviderError::wrap("getting Connect Hierarchy Group", e).for_resource(id.clone())
        })?;

    let group = resp.hierarchy_group().ok_or_else(|| {
        ProviderError::new("getting Connect Hierarchy Group: empty response")
            .for_resource(id.clone())
    })?;

    Ok(group_state(id, instance_id, group, ignore_tags))
}

/// Read by encoded identifier; a missing group maps to `State::not_found`
pub(crate) async fn read(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<State> {
    let (instance_id, group_id) = parse_id(identifier).map_err(|e| e.for_resource(id.clone()))?;

    match client
        .describe_user_hierarchy_group()
        .instance_id(&instance_id)
        .hierarchy_group_id(&group_id)
        .send()
        .await
    {
        Ok(resp) => {
            let group = resp.hierarchy_group().ok_or_else(|| {
                ProviderError::new("getting Connect Hierarchy Group: empty response")
                    .for_resource(id.clone())
            })?;
            Ok(group_state(id.clone(), &instance_id, group, ignore_tags))
        }
        Err(e) if is_resource_not_found(&e) => Ok(State::not_found(id.clone())),
        Err(e) => Err(
            ProviderError::wrap("getting Connect Hierarchy Group", e).for_resource(id.clone())
        ),
    }
}

pub(crate) async fn create(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    resource: &Resource,
) -> ProviderResult<State> {
    let id = resource.id.clone();

    let instance_id = resource
        .string_attr("instance_id")
        .ok_or_else(|| ProviderError::new("instance_id is required").for_resource(id.clone()))?;
    let name = resource
        .string_attr("name")
        .ok_or_else(|| ProviderError::new("name is required").for_resource(id.clone()))?;

    let mut req = client
        .create_user_hierarchy_group()
        .instance_id(instance_id)
        .name(name);

    if let Some(parent_group_id) = resource.string_attr("parent_group_id") {
        req = req.parent_group_id(parent_group_id);
    }

    if let Some(tags) = resource.attributes.get("tags") {
        let tags = KeyValueTags::from_value(tags);
        if !tags.is_empty() {
            req = req.set_tags(Some(tags.map()));
        }
    }

    let out = req.send().await.map_err(|e| {
        ProviderError::wrap("creating Connect Hierarchy Group", e).for_resource(id.clone())
    })?;

    let group_id = out.hierarchy_group_id().ok_or_else(|| {
        ProviderError::new("creating Connect Hierarchy Group: no ID returned")
            .for_resource(id.clone())
    })?;

    read(client, ignore_tags, &id, &encode_id(instance_id, group_id)).await
}

pub(crate) async fn update(
    client: &Client,
    ignore_tags: &IgnoreTagsConfig,
    id: &ResourceId,
    identifier: &str,
    from: &State,
    to: &Resource,
) -> ProviderResult<State> {
    let (instance_id, group_id) = parse_id(identifier).map_err(|e| e.for_resource(id.clone()))?;

    if let Some(name) = to.string_attr("name")
        && from.string_attr("name") != Some(name)
    {
        client
            .update_user_hierarchy_group_name()
            .instance_id(&instance_id)
            .hierarchy_group_id(&group_id)
            .name(name)
            .send()
            .await
            .map_err(|e| {
                ProviderError::wrap("updating Connect Hierarchy Group name", e)
                    .for_resource(id.clone())
            })?;
    }

    if let Some(arn) = from.string_attr("arn") {
        let current = from
            .map_attr("tags")
            .map(|m| KeyValueTags::from_value(&Value::Map(m.clone())))
            .unwrap_or_default();
        let desired = to
            .attributes
            .get("tags")
            .map(KeyValueTags::from_value)
            .unwrap_or_default();
        update_tags(client, arn, &current, &desired)
            .await
            .map_err(|e| e.for_resource(id.clone()))?;
    }

    read(client, ignore_tags, id, identifier).await
}

pub(crate) async fn delete(
    client: &Client,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<()> {
    let (instance_id, group_id) = parse_id(identifier).map_err(|e| e.for_resource(id.clone()))?;

    match client
        .delete_user_hierarchy_group()
        .instance_id(&instance_id)
        .hierarchy_group_id(&group_id)
        .send()
        .await
    {
        Ok(_) => Ok(()),
        Err(e) if is_resource_not_found(&e) => Ok(()),
        Err(e) => Err(
            ProviderError::wrap("deleting Connect Hierarchy Group", e).for_resource(id.clone())
        ),
    }
}

fn group_state(
    id: ResourceId,
    instance_id: &str,
    group: &HierarchyGroup,
    ignore_tags: &IgnoreTagsConfig,
) -> State {
    let mut attributes = HashMap::new();
    attributes.insert(
        "instance_id".to_string(),
        Value::String(instance_id.to_string()),
    );
    if let Some(arn) = group.arn() {
        attributes.insert("arn".to_string(), Value::String(arn.to_string()));
    }
    if let Some(group_id) = group.id() {
        attributes.insert(
            "hierarchy_group_id".to_string(),
            Value::String(group_id.to_string()),
        );
    }
    if let Some(level_id) = group.level_id() {
        attributes.insert("level_id".to_string(), Value::String(level_id.to_string()));
    }
    if let Some(name) = group.name() {
        attributes.insert("name".to_string(), Value::String(name.to_string()));
    }
    if let Some(path) = group.hierarchy_path() {
        attributes.insert("hierarchy_path".to_string(), flatten_hierarchy_path(path));
    }
    if let Some(tags) = group.tags() {
        attributes.insert(
            "tags".to_string(),
            KeyValueTags::from_map(tags)
                .ignore_aws()
                .ignore_config(ignore_tags)
                .to_value(),
        );
    }

    let identifier = encode_id(instance_id, group.id().unwrap_or_default());
    State::existing(id, attributes).with_identifier(identifier)
}

/// Single-element list holding the five levels, present levels only
fn flatten_hierarchy_path(path: &HierarchyPath) -> Value {
    let mut levels = HashMap::new();
    let entries = [
        ("level_one", path.level_one()),
        ("level_two", path.level_two()),
        ("level_three", path.level_three()),
        ("level_four", path.level_four()),
        ("level_five", path.level_five()),
    ];
    for (key, level) in entries {
        if let Some(summary) = level {
            levels.insert(key.to_string(), flatten_path_level(summary));
        }
    }
    Value::List(vec![Value::Map(levels)])
}

fn flatten_path_level(summary: &HierarchyGroupSummary) -> Value {
    let mut entry = HashMap::new();
    if let Some(arn) = summary.arn() {
        entry.insert("arn".to_string(), Value::String(arn.to_string()));
    }
    if let Some(id) = summary.id() {
        entry.insert("id".to_string(), Value::String(id.to_string()));
    }
    if let Some(name) = summary.name() {
        entry.insert("name".to_string(), Value::String(name.to_string()));
    }
    Value::Map(entry)
}

/// Paginated lookup by name; the last matching summary wins
async fn summary_by_name(
    client: &Client,
    instance_id: &str,
    name: &str,
) -> ProviderResult<Option<HierarchyGroupSummary>> {
    log::debug!("looking up Connect hierarchy group by name: {}", name);

    let mut result = None;
    let mut pages = client
        .list_user_hierarchy_groups()
        .instance_id(instance_id)
        .max_results(LIST_USER_HIERARCHY_GROUPS_MAX_RESULTS)
        .into_paginator()
        .send();

    while let Some(page) = pages.next().await {
        let page =
            page.map_err(|e| ProviderError::wrap("listing Connect Hierarchy Groups", e))?;
        for summary in page.user_hierarchy_group_summary_list() {
            if summary.name() == Some(name) {
                result = Some(summary.clone());
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, name: &str) -> HierarchyGroupSummary {
        HierarchyGroupSummary::builder()
            .id(id)
            .arn(format!(
                "arn:aws:connect:us-east-1:123456789012:instance/i-1/agent-group/{}",
                id
            ))
            .name(name)
            .build()
    }

    #[test]
    fn flatten_path_includes_present_levels_only() {
        let path = HierarchyPath::builder()
            .level_one(summary("g-1", "Region"))
            .level_two(summary("g-2", "Site"))
            .build();

        let value = flatten_hierarchy_path(&path);
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 1);

        let levels = items[0].as_map().unwrap();
        assert_eq!(levels.len(), 2);
        assert!(levels.contains_key("level_one"));
        assert!(levels.contains_key("level_two"));
        assert!(!levels.contains_key("level_three"));

        let level_one = levels.get("level_one").unwrap().as_map().unwrap();
        assert_eq!(level_one.get("id"), Some(&Value::String("g-1".to_string())));
        assert_eq!(
            level_one.get("name"),
            Some(&Value::String("Region".to_string()))
        );
    }

    #[test]
    fn group_state_sets_encoded_identifier() {
        let group = HierarchyGroup::builder()
            .id("g-1")
            .arn("arn:aws:connect:us-east-1:123456789012:instance/i-1/agent-group/g-1")
            .name("Region")
            .level_id("1")
            .build();

        let state = group_state(
            ResourceId::new("connect.user_hierarchy_group", "region"),
            "i-1",
            &group,
            &IgnoreTagsConfig::default(),
        );

        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("i-1:g-1"));
        assert_eq!(state.string_attr("hierarchy_group_id"), Some("g-1"));
        assert_eq!(state.string_attr("level_id"), Some("1"));
        assert_eq!(state.string_attr("instance_id"), Some("i-1"));
    }

    #[test]
    fn group_state_normalizes_tags() {
        let group = HierarchyGroup::builder()
            .id("g-1")
            .name("Region")
            .tags("Team", "support")
            .tags("aws:cloudformation:stack-name", "stack")
            .build();

        let state = group_state(
            ResourceId::new("connect.user_hierarchy_group", "region"),
            "i-1",
            &group,
            &IgnoreTagsConfig::default(),
        );

        let tags = state.map_attr("tags").unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("Team"), Some(&Value::String("support".to_string())));
    }
}
