//! Resource records and the attribute value model
//!
//! The host orchestrator owns resource state; providers only see opaque
//! attribute bags. `Resource` is the desired state handed over by the host,
//! `State` is what a provider mirrors back from the remote API.

use std::collections::HashMap;

/// Unique identifier for a resource as the host knows it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Resource type (e.g., "connect.routing_profile")
    pub resource_type: String,
    /// Name the host assigned to this record
    pub name: String,
}

impl ResourceId {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// Attribute value of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Desired state declared by the host
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub attributes: HashMap<String, Value>,
    /// If true, this is a data source (read-only lookup, never mutated)
    pub read_only: bool,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(resource_type, name),
            attributes: HashMap::new(),
            read_only: false,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Returns true if this record is a data source
    pub fn is_data_source(&self) -> bool {
        self.read_only
    }

    /// String attribute, if present and a string
    pub fn string_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Integer attribute, if present and an integer
    pub fn int_attr(&self, key: &str) -> Option<i64> {
        self.attributes.get(key).and_then(Value::as_int)
    }

    /// Boolean attribute, if present and a boolean
    pub fn bool_attr(&self, key: &str) -> Option<bool> {
        self.attributes.get(key).and_then(Value::as_bool)
    }

    /// List attribute, if present and a list
    pub fn list_attr(&self, key: &str) -> Option<&[Value]> {
        self.attributes.get(key).and_then(Value::as_list)
    }

    /// Map attribute, if present and a map
    pub fn map_attr(&self, key: &str) -> Option<&HashMap<String, Value>> {
        self.attributes.get(key).and_then(Value::as_map)
    }
}

/// Current state mirrored from the remote API
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: ResourceId,
    /// Provider-side identifier (an ARN, or an encoded compound ID)
    pub identifier: Option<String>,
    pub attributes: HashMap<String, Value>,
    /// Whether the remote resource exists
    pub exists: bool,
}

impl State {
    pub fn not_found(id: ResourceId) -> Self {
        Self {
            id,
            identifier: None,
            attributes: HashMap::new(),
            exists: false,
        }
    }

    pub fn existing(id: ResourceId, attributes: HashMap<String, Value>) -> Self {
        Self {
            id,
            identifier: None,
            attributes,
            exists: true,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn string_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn int_attr(&self, key: &str) -> Option<i64> {
        self.attributes.get(key).and_then(Value::as_int)
    }

    pub fn map_attr(&self, key: &str) -> Option<&HashMap<String, Value>> {
        self.attributes.get(key).and_then(Value::as_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_accessors() {
        let resource = Resource::new("batch.job_queue", "main")
            .with_attribute("name", Value::String("main-queue".to_string()))
            .with_attribute("priority", Value::Int(10))
            .with_attribute("enabled", Value::Bool(true));

        assert_eq!(resource.string_attr("name"), Some("main-queue"));
        assert_eq!(resource.int_attr("priority"), Some(10));
        assert_eq!(resource.bool_attr("enabled"), Some(true));
        assert_eq!(resource.string_attr("priority"), None);
        assert_eq!(resource.string_attr("missing"), None);
    }

    #[test]
    fn data_source_flag() {
        let resource = Resource::new("connect.routing_profile", "support").with_read_only(true);
        assert!(resource.is_data_source());
    }

    #[test]
    fn state_identifier() {
        let id = ResourceId::new("connect.user_hierarchy_group", "east");
        let state = State::existing(id.clone(), HashMap::new())
            .with_identifier("11111111-2222:33333333-4444");
        assert!(state.exists);
        assert_eq!(
            state.identifier.as_deref(),
            Some("11111111-2222:33333333-4444")
        );

        let gone = State::not_found(id);
        assert!(!gone.exists);
        assert!(gone.identifier.is_none());
    }
}
