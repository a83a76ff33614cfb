//! Shared library for the event record Lambda functions.
//!
//! This crate provides configuration, error types, the record model and the
//! record stores used by the gateway Lambdas.

pub mod attribute;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Record, StatusResponse};
pub use store::{DynamoRecordStore, InMemoryRecordStore, RecordStore};
