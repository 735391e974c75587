//! Field-level error state shared by Bizdesk forms.
//!
//! [`SchemaErrors`] is a `field -> [messages]` map. Forms keep one as their
//! live error state and hand it to [`DeskError`] when a submission fails.

pub mod validator_bridge;

pub use validator_bridge::{check, validation_errors};

use bizdesk_core::errors::DeskError;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaErrors {
    map: Map<String, Value>,
}

impl SchemaErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_field(&mut self, field: &str, msg: impl Into<String>) {
        Self::push_to(&mut self.map, field, msg);
    }

    fn push_to(map: &mut Map<String, Value>, key: &str, msg: impl Into<String>) {
        let msg = Value::String(msg.into());
        match map.get_mut(key) {
            Some(Value::Array(arr)) => arr.push(msg),
            _ => {
                map.insert(key.to_string(), Value::Array(vec![msg]));
            }
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.map.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> Vec<&str> {
        match self.map.get(field) {
            Some(Value::Array(arr)) => arr.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn clear_field(&mut self, field: &str) {
        self.map.remove(field);
    }

    /// Field names currently holding at least one error.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Copy every message from `other` into `self`.
    pub fn merge(&mut self, other: SchemaErrors) {
        for (key, value) in other.map {
            if let Value::Array(items) = value {
                for item in items {
                    if let Value::String(msg) = item {
                        Self::push_to(&mut self.map, &key, msg);
                    }
                }
            }
        }
    }

    /// Keep only the listed fields.
    pub fn retain_fields(&mut self, fields: &[&str]) {
        self.map.retain(|k, _| fields.contains(&k.as_str()));
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `Unprocessable` carrying this map as its `errors`.
    pub fn into_unprocessable(self, message: impl Into<String>) -> DeskError {
        DeskError::unprocessable(message).with_errors(Value::Object(self.map))
    }
}
