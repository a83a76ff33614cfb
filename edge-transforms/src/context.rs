//! Per-request context variables shared with the gateway runtime.

use serde::Serialize;
use serde_json::{Map, Value};

/// Variables a script wrote or removed, in the shape the gateway runtime applies.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Changes {
    pub set: Map<String, Value>,
    pub removed: Vec<String>,
}

/// The gateway runtime's variable bag for one request.
///
/// Reads never fail: a missing or mistyped variable reads as absent.
#[derive(Debug, Default, Clone)]
pub struct VariableBag {
    values: Map<String, Value>,
    changes: Changes,
}

impl VariableBag {
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            values,
            changes: Changes::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// String variable; empty strings read as absent.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Status-code style variable, accepted as a number or a numeric string.
    pub fn get_u16(&self, name: &str) -> Option<u16> {
        match self.get(name)? {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// List-of-strings variable; anything other than an array reads as empty.
    pub fn get_string_list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        self.changes.removed.retain(|removed| removed != &name);
        self.changes.set.insert(name.clone(), value.clone());
        self.values.insert(name, value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.changes.set.remove(name);
        if !self.changes.removed.iter().any(|removed| removed == name) {
            self.changes.removed.push(name.to_string());
        }
        self.values.remove(name)
    }

    pub fn changes(&self) -> &Changes {
        &self.changes
    }

    pub fn into_changes(self) -> Changes {
        self.changes
    }
}
