//! Configuration change events.

use serde::Serialize;
use serde_json::Value;

use super::observer::ChangeEvent;

/// A single setting changed from `old_value` to `new_value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigChange {
    pub key: String,
    pub old_value: Value,
    pub new_value: Value,
}

impl ConfigChange {
    pub fn new(key: impl Into<String>, old_value: impl Into<Value>, new_value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }
}

impl ChangeEvent for ConfigChange {
    fn key(&self) -> &str {
        &self.key
    }
}
