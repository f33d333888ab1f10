//! Service-package registration tables
//!
//! A service package is the unit a cloud service module exposes to the host:
//! a table of resources and data sources, each row pairing a type name with
//! a schema factory. The host looks adapters up by type name; there is no
//! architecture beyond that.

use std::collections::HashMap;

use crate::resource::Resource;
use crate::schema::{ResourceSchema, TypeError};

/// Tag handling declared for a registration
#[derive(Debug, Clone, Default)]
pub struct TagsSpec {
    /// Attribute holding the identifier passed to tag APIs (usually "arn")
    pub identifier_attribute: Option<&'static str>,
}

/// A managed resource row in a service package table
#[derive(Clone)]
pub struct ResourceRegistration {
    /// Fully qualified type name (e.g., "batch.job_queue")
    pub type_name: &'static str,
    /// Human-readable name (e.g., "Job Queue")
    pub name: &'static str,
    /// Schema factory
    pub schema: fn() -> ResourceSchema,
    pub tags: Option<TagsSpec>,
}

/// A data source row in a service package table
#[derive(Clone)]
pub struct DataSourceRegistration {
    pub type_name: &'static str,
    pub name: &'static str,
    pub schema: fn() -> ResourceSchema,
    pub tags: Option<TagsSpec>,
}

/// A cloud service module's registration table
pub trait ServicePackage: Send + Sync {
    /// Service name (e.g., "connect")
    fn service_name(&self) -> &'static str;

    fn resources(&self) -> Vec<ResourceRegistration> {
        Vec::new()
    }

    fn data_sources(&self) -> Vec<DataSourceRegistration> {
        Vec::new()
    }
}

/// Registry construction error
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate resource type '{type_name}' registered by service '{service}'")]
    DuplicateResource {
        type_name: &'static str,
        service: &'static str,
    },

    #[error("Duplicate data source type '{type_name}' registered by service '{service}'")]
    DuplicateDataSource {
        type_name: &'static str,
        service: &'static str,
    },
}

/// Lookup table over every registered service package
pub struct Registry {
    services: Vec<&'static str>,
    resources: HashMap<&'static str, ResourceRegistration>,
    data_sources: HashMap<&'static str, DataSourceRegistration>,
}

impl Registry {
    pub fn new(packages: &[Box<dyn ServicePackage>]) -> Result<Self, RegistryError> {
        let mut services = Vec::new();
        let mut resources = HashMap::new();
        let mut data_sources = HashMap::new();

        for package in packages {
            services.push(package.service_name());

            for registration in package.resources() {
                let type_name = registration.type_name;
                if resources.insert(type_name, registration).is_some() {
                    return Err(RegistryError::DuplicateResource {
                        type_name,
                        service: package.service_name(),
                    });
                }
            }

            for registration in package.data_sources() {
                let type_name = registration.type_name;
                if data_sources.insert(type_name, registration).is_some() {
                    return Err(RegistryError::DuplicateDataSource {
                        type_name,
                        service: package.service_name(),
                    });
                }
            }
        }

        Ok(Self {
            services,
            resources,
            data_sources,
        })
    }

    pub fn services(&self) -> &[&'static str] {
        &self.services
    }

    pub fn resource(&self, type_name: &str) -> Option<&ResourceRegistration> {
        self.resources.get(type_name)
    }

    pub fn data_source(&self, type_name: &str) -> Option<&DataSourceRegistration> {
        self.data_sources.get(type_name)
    }

    pub fn resource_type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.resources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn data_source_type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.data_sources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Validate a record against its registered schema
    ///
    /// Data sources are validated against the data source table, managed
    /// records against the resource table. Unknown type names report a
    /// single validation error.
    pub fn validate(&self, resource: &Resource) -> Result<(), Vec<TypeError>> {
        let type_name = resource.id.resource_type.as_str();
        let schema = if resource.is_data_source() {
            self.data_source(type_name).map(|r| (r.schema)())
        } else {
            self.resource(type_name).map(|r| (r.schema)())
        };

        match schema {
            Some(schema) => schema.validate(&resource.attributes),
            None => Err(vec![TypeError::UnknownAttribute {
                name: format!("unregistered type '{}'", type_name),
            }]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Value;
    use crate::schema::{AttributeSchema, AttributeType};

    fn queue_schema() -> ResourceSchema {
        ResourceSchema::new("mock.queue")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
    }

    struct MockService;

    impl ServicePackage for MockService {
        fn service_name(&self) -> &'static str {
            "mock"
        }

        fn resources(&self) -> Vec<ResourceRegistration> {
            vec![ResourceRegistration {
                type_name: "mock.queue",
                name: "Queue",
                schema: queue_schema,
                tags: Some(TagsSpec {
                    identifier_attribute: Some("arn"),
                }),
            }]
        }

        fn data_sources(&self) -> Vec<DataSourceRegistration> {
            vec![DataSourceRegistration {
                type_name: "mock.queue",
                name: "Queue",
                schema: queue_schema,
                tags: None,
            }]
        }
    }

    #[test]
    fn lookup_by_type_name() {
        let packages: Vec<Box<dyn ServicePackage>> = vec![Box::new(MockService)];
        let registry = Registry::new(&packages).unwrap();

        assert_eq!(registry.services(), &["mock"]);
        assert!(registry.resource("mock.queue").is_some());
        assert!(registry.data_source("mock.queue").is_some());
        assert!(registry.resource("mock.missing").is_none());

        let tags = registry.resource("mock.queue").unwrap().tags.clone().unwrap();
        assert_eq!(tags.identifier_attribute, Some("arn"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let packages: Vec<Box<dyn ServicePackage>> =
            vec![Box::new(MockService), Box::new(MockService)];
        assert!(matches!(
            Registry::new(&packages),
            Err(RegistryError::DuplicateResource { .. })
        ));
    }

    #[test]
    fn validate_uses_registered_schema() {
        let packages: Vec<Box<dyn ServicePackage>> = vec![Box::new(MockService)];
        let registry = Registry::new(&packages).unwrap();

        let valid = Resource::new("mock.queue", "main")
            .with_attribute("name", Value::String("main".to_string()));
        assert!(registry.validate(&valid).is_ok());

        let invalid = Resource::new("mock.queue", "main");
        assert!(registry.validate(&invalid).is_err());

        let unknown = Resource::new("mock.topic", "main");
        assert!(registry.validate(&unknown).is_err());
    }
}
