//! Stratus AWS Provider
//!
//! Maps host resource records to AWS API calls through the typed SDK
//! clients, one service module per AWS service.

pub mod batch;
pub mod connect;
pub mod schemas;

use aws_config::Region;
use aws_sdk_batch::Client as BatchClient;
use aws_sdk_connect::Client as ConnectClient;
use stratus_core::provider::{BoxFuture, Provider, ProviderError, ProviderResult};
use stratus_core::registry::{Registry, RegistryError, ServicePackage};
use stratus_core::resource::{Resource, ResourceId, State};
use stratus_core::tags::IgnoreTagsConfig;

/// Registration tables for every AWS service package this provider carries
pub fn service_packages() -> Vec<Box<dyn ServicePackage>> {
    vec![
        Box::new(batch::BatchService),
        Box::new(connect::ConnectService),
    ]
}

/// Build the registry over all AWS service packages
pub fn registry() -> Result<Registry, RegistryError> {
    Registry::new(&service_packages())
}

/// AWS Provider
pub struct AwsProvider {
    connect_client: ConnectClient,
    batch_client: BatchClient,
    region: String,
    ignore_tags: IgnoreTagsConfig,
}

impl AwsProvider {
    /// Create a new AWS provider for the given region
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            connect_client: ConnectClient::new(&config),
            batch_client: BatchClient::new(&config),
            region: region.to_string(),
            ignore_tags: IgnoreTagsConfig::default(),
        }
    }

    /// Create with specific clients (for testing)
    pub fn with_clients(
        connect_client: ConnectClient,
        batch_client: BatchClient,
        region: String,
    ) -> Self {
        Self {
            connect_client,
            batch_client,
            region,
            ignore_tags: IgnoreTagsConfig::default(),
        }
    }

    /// Set the provider-level tag ignore configuration
    pub fn with_ignore_tags(mut self, ignore_tags: IgnoreTagsConfig) -> Self {
        self.ignore_tags = ignore_tags;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl Provider for AwsProvider {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn registry(&self) -> Registry {
        // The tables are hand-written and disjoint; a collision is a bug in
        // this crate, caught by the registry tests below.
        registry().expect("AWS service package tables must not collide")
    }

    fn read(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move {
            match id.resource_type.as_str() {
                "connect.user_hierarchy_group" => {
                    connect::user_hierarchy_group::read(
                        &self.connect_client,
                        &self.ignore_tags,
                        &id,
                        &identifier,
                    )
                    .await
                }
                "batch.job_queue" => {
                    batch::job_queue::read(&self.batch_client, &self.ignore_tags, &id, &identifier)
                        .await
                }
                "batch.scheduling_policy" => {
                    batch::scheduling_policy::read(
                        &self.batch_client,
                        &self.ignore_tags,
                        &id,
                        &identifier,
                    )
                    .await
                }
                other => Err(
                    ProviderError::new(format!("Unknown resource type: {}", other))
                        .for_resource(id.clone()),
                ),
            }
        })
    }

    fn read_data_source(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move {
            match resource.id.resource_type.as_str() {
                "connect.routing_profile" => {
                    connect::routing_profile::read_data_source(
                        &self.connect_client,
                        &self.ignore_tags,
                        &resource,
                    )
                    .await
                }
                "connect.user_hierarchy_group" => {
                    connect::user_hierarchy_group::read_data_source(
                        &self.connect_client,
                        &self.ignore_tags,
                        &resource,
                    )
                    .await
                }
                "batch.compute_environment" => {
                    batch::compute_environment::read_data_source(
                        &self.batch_client,
                        &self.ignore_tags,
                        &resource,
                    )
                    .await
                }
                "batch.job_queue" => {
                    batch::job_queue::read_data_source(
                        &self.batch_client,
                        &self.ignore_tags,
                        &resource,
                    )
                    .await
                }
                "batch.scheduling_policy" => {
                    batch::scheduling_policy::read_data_source(
                        &self.batch_client,
                        &self.ignore_tags,
                        &resource,
                    )
                    .await
                }
                other => Err(
                    ProviderError::new(format!("Unknown data source type: {}", other))
                        .for_resource(resource.id.clone()),
                ),
            }
        })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move {
            match resource.id.resource_type.as_str() {
                "connect.user_hierarchy_group" => {
                    connect::user_hierarchy_group::create(
                        &self.connect_client,
                        &self.ignore_tags,
                        &resource,
                    )
                    .await
                }
                "batch.job_queue" => {
                    batch::job_queue::create(&self.batch_client, &self.ignore_tags, &resource)
                        .await
                }
                "batch.scheduling_policy" => {
                    batch::scheduling_policy::create(
                        &self.batch_client,
                        &self.ignore_tags,
                        &resource,
                    )
                    .await
                }
                other => Err(
                    ProviderError::new(format!("Unknown resource type: {}", other))
                        .for_resource(resource.id.clone()),
                ),
            }
        })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move {
            match id.resource_type.as_str() {
                "connect.user_hierarchy_group" => {
                    connect::user_hierarchy_group::update(
                        &self.connect_client,
                        &self.ignore_tags,
                        &id,
                        &identifier,
                        &from,
                        &to,
                    )
                    .await
                }
                "batch.job_queue" => {
                    batch::job_queue::update(
                        &self.batch_client,
                        &self.ignore_tags,
                        &id,
                        &identifier,
                        &from,
                        &to,
                    )
                    .await
                }
                "batch.scheduling_policy" => {
                    batch::scheduling_policy::update(
                        &self.batch_client,
                        &self.ignore_tags,
                        &id,
                        &identifier,
                        &from,
                        &to,
                    )
                    .await
                }
                other => Err(
                    ProviderError::new(format!("Unknown resource type: {}", other))
                        .for_resource(id.clone()),
                ),
            }
        })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move {
            match id.resource_type.as_str() {
                "connect.user_hierarchy_group" => {
                    connect::user_hierarchy_group::delete(&self.connect_client, &id, &identifier)
                        .await
                }
                "batch.job_queue" => {
                    batch::job_queue::delete(&self.batch_client, &id, &identifier).await
                }
                "batch.scheduling_policy" => {
                    batch::scheduling_policy::delete(&self.batch_client, &id, &identifier).await
                }
                other => Err(
                    ProviderError::new(format!("Unknown resource type: {}", other))
                        .for_resource(id.clone()),
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_without_collisions() {
        let registry = registry().unwrap();
        assert_eq!(registry.services(), &["batch", "connect"]);
    }

    #[test]
    fn registry_lists_expected_adapters() {
        let registry = registry().unwrap();

        assert_eq!(
            registry.resource_type_names(),
            vec![
                "batch.job_queue",
                "batch.scheduling_policy",
                "connect.user_hierarchy_group",
            ]
        );
        assert_eq!(
            registry.data_source_type_names(),
            vec![
                "batch.compute_environment",
                "batch.job_queue",
                "batch.scheduling_policy",
                "connect.routing_profile",
                "connect.user_hierarchy_group",
            ]
        );
    }

    #[test]
    fn batch_resources_tag_by_arn() {
        let registry = registry().unwrap();
        let job_queue = registry.resource("batch.job_queue").unwrap();
        let tags = job_queue.tags.clone().unwrap();
        assert_eq!(tags.identifier_attribute, Some("arn"));
    }
}
