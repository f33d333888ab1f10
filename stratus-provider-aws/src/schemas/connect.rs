//! Schemas for the Connect service package

use stratus_core::resource::Value;
use stratus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

fn instance_id() -> AttributeType {
    types::sized_string("ConnectInstanceId", |value| match value {
        Value::String(s) if (1..=100).contains(&s.len()) => Ok(()),
        Value::String(_) => Err("Instance ID must be between 1 and 100 characters".to_string()),
        _ => Err("Expected string".to_string()),
    })
}

fn hierarchy_path_type() -> AttributeType {
    let level = AttributeType::Object(vec![
        ("arn".to_string(), AttributeType::String),
        ("id".to_string(), AttributeType::String),
        ("name".to_string(), AttributeType::String),
    ]);
    AttributeType::List(Box::new(AttributeType::Object(vec![
        ("level_one".to_string(), level.clone()),
        ("level_two".to_string(), level.clone()),
        ("level_three".to_string(), level.clone()),
        ("level_four".to_string(), level.clone()),
        ("level_five".to_string(), level),
    ])))
}

pub fn routing_profile_data_source_schema() -> ResourceSchema {
    let media_concurrencies = AttributeType::List(Box::new(AttributeType::Object(vec![
        ("channel".to_string(), AttributeType::String),
        ("concurrency".to_string(), AttributeType::Int),
    ])));
    let queue_configs = AttributeType::List(Box::new(AttributeType::Object(vec![
        ("channel".to_string(), AttributeType::String),
        ("delay".to_string(), AttributeType::Int),
        ("priority".to_string(), AttributeType::Int),
        ("queue_arn".to_string(), AttributeType::String),
        ("queue_id".to_string(), AttributeType::String),
        ("queue_name".to_string(), AttributeType::String),
    ])));

    ResourceSchema::new("connect.routing_profile")
        .with_description("Looks up a Connect routing profile by ID or name")
        .attribute(AttributeSchema::new("instance_id", instance_id()).required())
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .computed()
                .optional()
                .exactly_one_of(&["name", "routing_profile_id"]),
        )
        .attribute(
            AttributeSchema::new("routing_profile_id", AttributeType::String)
                .computed()
                .optional()
                .exactly_one_of(&["name", "routing_profile_id"]),
        )
        .attribute(AttributeSchema::new("arn", AttributeType::String).computed())
        .attribute(
            AttributeSchema::new("default_outbound_queue_id", AttributeType::String).computed(),
        )
        .attribute(AttributeSchema::new("description", AttributeType::String).computed())
        .attribute(AttributeSchema::new("media_concurrencies", media_concurrencies).computed())
        .attribute(AttributeSchema::new("queue_configs", queue_configs).computed())
        .attribute(AttributeSchema::new("tags", types::string_map()).computed())
}

pub fn user_hierarchy_group_data_source_schema() -> ResourceSchema {
    ResourceSchema::new("connect.user_hierarchy_group")
        .with_description("Looks up a Connect user hierarchy group by ID or name")
        .attribute(AttributeSchema::new("instance_id", instance_id()).required())
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .computed()
                .optional()
                .exactly_one_of(&["hierarchy_group_id", "name"]),
        )
        .attribute(
            AttributeSchema::new("hierarchy_group_id", AttributeType::String)
                .computed()
                .optional()
                .exactly_one_of(&["hierarchy_group_id", "name"]),
        )
        .attribute(AttributeSchema::new("arn", AttributeType::String).computed())
        .attribute(AttributeSchema::new("level_id", AttributeType::String).computed())
        .attribute(AttributeSchema::new("hierarchy_path", hierarchy_path_type()).computed())
        .attribute(AttributeSchema::new("tags", types::string_map()).computed())
}

pub fn user_hierarchy_group_schema() -> ResourceSchema {
    ResourceSchema::new("connect.user_hierarchy_group")
        .with_description("Manages a Connect user hierarchy group")
        .attribute(AttributeSchema::new("instance_id", instance_id()).required())
        .attribute(AttributeSchema::new("name", AttributeType::String).required())
        .attribute(AttributeSchema::new("parent_group_id", AttributeType::String).optional())
        .attribute(AttributeSchema::new("arn", AttributeType::String).computed())
        .attribute(AttributeSchema::new("hierarchy_group_id", AttributeType::String).computed())
        .attribute(AttributeSchema::new("level_id", AttributeType::String).computed())
        .attribute(AttributeSchema::new("hierarchy_path", hierarchy_path_type()).computed())
        .attribute(AttributeSchema::new("tags", types::string_map()).optional())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stratus_core::schema::TypeError;

    #[test]
    fn routing_profile_lookup_needs_id_or_name() {
        let schema = routing_profile_data_source_schema();

        let mut attrs = HashMap::new();
        attrs.insert("instance_id".to_string(), Value::String("i-1".to_string()));
        assert!(schema.validate(&attrs).is_err());

        attrs.insert("name".to_string(), Value::String("support".to_string()));
        assert!(schema.validate(&attrs).is_ok());
    }

    #[test]
    fn instance_id_length_is_validated() {
        let schema = user_hierarchy_group_schema();

        let mut attrs = HashMap::new();
        attrs.insert("instance_id".to_string(), Value::String("x".repeat(101)));
        attrs.insert("name".to_string(), Value::String("Region".to_string()));

        let errors = schema.validate(&attrs).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, TypeError::ValidationFailed { .. })));
    }

    #[test]
    fn managed_group_rejects_computed_arn() {
        let schema = user_hierarchy_group_schema();

        let mut attrs = HashMap::new();
        attrs.insert("instance_id".to_string(), Value::String("i-1".to_string()));
        attrs.insert("name".to_string(), Value::String("Region".to_string()));
        attrs.insert(
            "arn".to_string(),
            Value::String("arn:aws:connect:us-east-1:123456789012:instance/i-1".to_string()),
        );

        let errors = schema.validate(&attrs).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, TypeError::ReadOnly { name } if name == "arn")));
    }

    #[test]
    fn managed_group_accepts_tags() {
        let schema = user_hierarchy_group_schema();

        let mut tags = HashMap::new();
        tags.insert("Team".to_string(), Value::String("support".to_string()));

        let mut attrs = HashMap::new();
        attrs.insert("instance_id".to_string(), Value::String("i-1".to_string()));
        attrs.insert("name".to_string(), Value::String("Region".to_string()));
        attrs.insert("tags".to_string(), Value::Map(tags));

        assert!(schema.validate(&attrs).is_ok());
    }
}
