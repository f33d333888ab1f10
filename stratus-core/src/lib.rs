//! Stratus Core
//!
//! Host-facing contract for infrastructure providers: the attribute value
//! model, resource schemas, the provider trait, service-package registration
//! tables, and tag normalization.

pub mod provider;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod tags;
