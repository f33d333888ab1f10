//! Published schemas, one module per AWS service

pub mod batch;
pub mod connect;
