//! Untyped records as extracted by an adapter.

use std::collections::BTreeMap;

/// Source-specific bag of string fields.
///
/// Only lives inside an adapter call; the normalizer turns it into a
/// [`crate::models::Notice`] or discards it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Field value, or an empty string when absent.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(|s| s.as_str()).unwrap_or("")
    }

    /// Field value trimmed, `None` when absent or blank.
    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Build a record from a JSON object, keeping scalar fields as strings.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let mut record = Self::new();
        for (key, value) in obj {
            match value {
                serde_json::Value::String(s) => record.insert(key, s.clone()),
                serde_json::Value::Number(n) => record.insert(key, n.to_string()),
                serde_json::Value::Bool(b) => record.insert(key, b.to_string()),
                _ => {}
            }
        }
        Some(record)
    }
}
