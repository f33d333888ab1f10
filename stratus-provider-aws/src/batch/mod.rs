//! AWS Batch service package
//!
//! Batch describe APIs return an empty list for unknown identifiers rather
//! than a not-found error, so the adapters here translate empty responses
//! into missing state themselves.

pub mod compute_environment;
pub mod job_queue;
pub mod scheduling_policy;

use std::time::Duration;

use aws_sdk_batch::Client;
use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::registry::{
    DataSourceRegistration, ResourceRegistration, ServicePackage, TagsSpec,
};
use stratus_core::tags::KeyValueTags;

use crate::schemas;

/// Delay between polls while waiting on a Batch resource transition
pub(crate) const WAIT_DELAY: Duration = Duration::from_secs(5);
/// Upper bound on poll attempts before a wait gives up
pub(crate) const WAIT_MAX_ATTEMPTS: u32 = 120;

/// Registration table for the Batch service
pub struct BatchService;

impl ServicePackage for BatchService {
    fn service_name(&self) -> &'static str {
        "batch"
    }

    fn resources(&self) -> Vec<ResourceRegistration> {
        vec![
            ResourceRegistration {
                type_name: "batch.job_queue",
                name: "Job Queue",
                schema: schemas::batch::job_queue_schema,
                tags: Some(TagsSpec {
                    identifier_attribute: Some("arn"),
                }),
            },
            ResourceRegistration {
                type_name: "batch.scheduling_policy",
                name: "Scheduling Policy",
                schema: schemas::batch::scheduling_policy_schema,
                tags: Some(TagsSpec {
                    identifier_attribute: Some("arn"),
                }),
            },
        ]
    }

    fn data_sources(&self) -> Vec<DataSourceRegistration> {
        vec![
            DataSourceRegistration {
                type_name: "batch.compute_environment",
                name: "Compute Environment",
                schema: schemas::batch::compute_environment_data_source_schema,
                tags: Some(TagsSpec::default()),
            },
            DataSourceRegistration {
                type_name: "batch.job_queue",
                name: "Job Queue",
                schema: schemas::batch::job_queue_data_source_schema,
                tags: Some(TagsSpec::default()),
            },
            DataSourceRegistration {
                type_name: "batch.scheduling_policy",
                name: "Scheduling Policy",
                schema: schemas::batch::scheduling_policy_data_source_schema,
                tags: Some(TagsSpec::default()),
            },
        ]
    }
}

/// Apply a tag diff through the Batch tagging APIs
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
            .map_err(|e| ProviderError::wrap("untagging Batch resource", e))?;
    }

    let updated = from.updated(to);
    if !updated.is_empty() {
        client
            .tag_resource()
            .resource_arn(arn)
            .set_tags(Some(updated))
            .send()
            .await
            .map_err(|e| ProviderError::wrap("tagging Batch resource", e))?;
    }

    Ok(())
}
