//! Shared data models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A stored event record: a JSON object keyed by its string `id`.
///
/// Fields other than `id` are opaque and stored as given.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// The record's key.
    pub fn id(&self) -> &str {
        // Construction guarantees `id` is a string.
        self.0.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Self::try_from(fields),
            other => Err(Error::Validation(format!(
                "Record must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl TryFrom<Map<String, Value>> for Record {
    type Error = Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        match fields.get("id") {
            Some(Value::String(_)) => Ok(Self(fields)),
            Some(other) => Err(Error::Validation(format!(
                "Record id must be a string, got {}",
                json_kind(other)
            ))),
            None => Err(Error::Validation("Record is missing an id".to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Health check payload for `GET /_status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            message: "Backend is up and running.".to_string(),
        }
    }
}
