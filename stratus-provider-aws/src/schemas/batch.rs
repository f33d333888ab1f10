//! Schemas for the Batch service package

use stratus_core::resource::Value;
use stratus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

fn batch_name() -> AttributeType {
    types::sized_string("BatchName", |value| match value {
        Value::String(s) => {
            if s.is_empty() || s.len() > 128 {
                return Err("Name must be between 1 and 128 characters".to_string());
            }
            if !s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(
                    "Name may only contain letters, numbers, underscores and hyphens".to_string(),
                );
            }
            Ok(())
        }
        _ => Err("Expected string".to_string()),
    })
}

fn compute_environment_order_type() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::Object(vec![
        ("order".to_string(), AttributeType::Int),
        ("compute_environment".to_string(), AttributeType::String),
    ])))
}

fn fair_share_policy_type() -> AttributeType {
    AttributeType::Object(vec![
        ("compute_reservation".to_string(), AttributeType::Int),
        ("share_decay_seconds".to_string(), AttributeType::Int),
    ])
}

fn state_enum() -> AttributeType {
    AttributeType::Enum(vec!["ENABLED".to_string(), "DISABLED".to_string()])
}

pub fn compute_environment_data_source_schema() -> ResourceSchema {
    ResourceSchema::new("batch.compute_environment")
        .with_description("Looks up a Batch compute environment by name")
        .attribute(AttributeSchema::new("compute_environment_name", batch_name()).required())
        .attribute(AttributeSchema::new("arn", AttributeType::String).computed())
        .attribute(AttributeSchema::new("ecs_cluster_arn", AttributeType::String).computed())
        .attribute(AttributeSchema::new("service_role", AttributeType::String).computed())
        .attribute(AttributeSchema::new("type", AttributeType::String).computed())
        .attribute(AttributeSchema::new("state", AttributeType::String).computed())
        .attribute(AttributeSchema::new("status", AttributeType::String).computed())
        .attribute(AttributeSchema::new("status_reason", AttributeType::String).computed())
        .attribute(AttributeSchema::new("tags", types::string_map()).computed())
}

pub fn job_queue_data_source_schema() -> ResourceSchema {
    ResourceSchema::new("batch.job_queue")
        .with_description("Looks up a Batch job queue by name")
        .attribute(AttributeSchema::new("name", batch_name()).required())
        .attribute(AttributeSchema::new("arn", AttributeType::String).computed())
        .attribute(AttributeSchema::new("priority", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("state", AttributeType::String).computed())
        .attribute(AttributeSchema::new("status", AttributeType::String).computed())
        .attribute(AttributeSchema::new("status_reason", AttributeType::String).computed())
        .attribute(AttributeSchema::new("scheduling_policy_arn", AttributeType::String).computed())
        .attribute(
            AttributeSchema::new("compute_environment_order", compute_environment_order_type())
                .computed(),
        )
        .attribute(AttributeSchema::new("tags", types::string_map()).computed())
}

pub fn job_queue_schema() -> ResourceSchema {
    ResourceSchema::new("batch.job_queue")
        .with_description("Manages a Batch job queue")
        .attribute(AttributeSchema::new("name", batch_name()).required())
        .attribute(AttributeSchema::new("priority", AttributeType::Int).required())
        .attribute(
            AttributeSchema::new("state", state_enum())
                .optional()
                .with_default(Value::String("ENABLED".to_string())),
        )
        .attribute(
            AttributeSchema::new("compute_environment_order", compute_environment_order_type())
                .required(),
        )
        .attribute(AttributeSchema::new("scheduling_policy_arn", AttributeType::String).optional())
        .attribute(AttributeSchema::new("arn", AttributeType::String).computed())
        .attribute(AttributeSchema::new("status", AttributeType::String).computed())
        .attribute(AttributeSchema::new("status_reason", AttributeType::String).computed())
        .attribute(AttributeSchema::new("tags", types::string_map()).optional())
}

pub fn scheduling_policy_data_source_schema() -> ResourceSchema {
    ResourceSchema::new("batch.scheduling_policy")
        .with_description("Looks up a Batch scheduling policy by ARN")
        .attribute(AttributeSchema::new("arn", AttributeType::String).required())
        .attribute(AttributeSchema::new("name", AttributeType::String).computed())
        .attribute(AttributeSchema::new("fair_share_policy", fair_share_policy_type()).computed())
        .attribute(AttributeSchema::new("tags", types::string_map()).computed())
}

pub fn scheduling_policy_schema() -> ResourceSchema {
    ResourceSchema::new("batch.scheduling_policy")
        .with_description("Manages a Batch scheduling policy")
        .attribute(AttributeSchema::new("name", batch_name()).required())
        .attribute(AttributeSchema::new("fair_share_policy", fair_share_policy_type()).optional())
        .attribute(AttributeSchema::new("arn", AttributeType::String).computed())
        .attribute(AttributeSchema::new("tags", types::string_map()).optional())
}
