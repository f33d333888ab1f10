//! Amazon Connect service package
//!
//! Connect resources live inside an instance, so provider-side identifiers
//! are encoded as `<instance-id>:<resource-id>`.

pub mod routing_profile;
pub mod user_hierarchy_group;

use aws_sdk_connect::Client;
use aws_sdk_connect::error::{ProvideErrorMetadata, SdkError};
use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::registry::{
    DataSourceRegistration, ResourceRegistration, ServicePackage, TagsSpec,
};
use stratus_core::tags::KeyValueTags;

use crate::schemas;

pub(crate) const LIST_ROUTING_PROFILES_MAX_RESULTS: i32 = 60;
pub(crate) const LIST_ROUTING_PROFILE_QUEUES_MAX_RESULTS: i32 = 60;
pub(crate) const LIST_USER_HIERARCHY_GROUPS_MAX_RESULTS: i32 = 60;

/// Registration table for the Connect service
pub struct ConnectService;

impl ServicePackage for ConnectService {
    fn service_name(&self) -> &'static str {
        "connect"
    }

    fn resources(&self) -> Vec<ResourceRegistration> {
        vec![ResourceRegistration {
            type_name: "connect.user_hierarchy_group",
            name: "User Hierarchy Group",
            schema: schemas::connect::user_hierarchy_group_schema,
            tags: Some(TagsSpec {
                identifier_attribute: Some("arn"),
            }),
        }]
    }

    fn data_sources(&self) -> Vec<DataSourceRegistration> {
        vec![
            DataSourceRegistration {
                type_name: "connect.routing_profile",
                name: "Routing Profile",
                schema: schemas::connect::routing_profile_data_source_schema,
                tags: Some(TagsSpec::default()),
            },
            DataSourceRegistration {
                type_name: "connect.user_hierarchy_group",
                name: "User Hierarchy Group",
                schema: schemas::connect::user_hierarchy_group_data_source_schema,
                tags: Some(TagsSpec::default()),
            },
        ]
    }
}

/// Encode an instance-scoped identifier
pub(crate) fn encode_id(instance_id: &str, resource_id: &str) -> String {
    format!("{}:{}", instance_id, resource_id)
}

/// Split an `<instance-id>:<resource-id>` identifier
pub(crate) fn parse_id(identifier: &str) -> ProviderResult<(String, String)> {
    match identifier.split_once(':') {
        Some((instance_id, resource_id)) if !instance_id.is_empty() && !resource_id.is_empty() => {
            Ok((instance_id.to_string(), resource_id.to_string()))
        }
        _ => Err(ProviderError::new(format!(
            "Invalid Connect identifier '{}', expected instance-id:resource-id",
            identifier
        ))),
    }
}

/// Whether an SDK error is the service's not-found error
pub(crate) fn is_resource_not_found<E, R>(err: &SdkError<E, R>) -> bool
where
    SdkError<E, R>: ProvideErrorMetadata,
{
    err.code() == Some("ResourceNotFoundException")
}

/// Apply a tag diff through the Connect tagging APIs
pub(crate) async fn update_tags(
    client: &Client,
    arn: &str,
    from: &KeyValueTags,
    to: &KeyValueTags,
) -> ProviderResult<()> {
    let removed = from.removed(to);
    if !removed.is_empty() {
        client
            .untag_resource()
            .resource_arn(arn)
            .set_tag_keys(Some(removed))
            .send()
            .await
            .map_err(|e| ProviderError::wrap("untagging Connect resource", e))?;
    }

    let updated = from.updated(to);
    if !updated.is_empty() {
        client
            .tag_resource()
            .resource_arn(arn)
            .set_tags(Some(updated))
            .send()
            .await
            .map_err(|e| ProviderError::wrap("tagging Connect resource", e))?;
    }

    Ok(())
}
