//! Correlation id resolution.
//!
//! A correlation id links every log line and outbound message produced while
//! handling one logical message. It is looked up in the message (payload
//! attribute first, then the header name) and generated when absent.

use crate::config::JeffyConfig;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Something a correlation id can be read from.
pub trait CorrelationSource {
    /// Return the non-empty string stored under `key`, if any.
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl CorrelationSource for Value {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.as_object()?.get(key)?.as_str().filter(|s| !s.is_empty())
    }
}

impl<T: CorrelationSource> CorrelationSource for Option<T> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.as_ref()?.lookup(key)
    }
}

impl CorrelationSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str).filter(|s| !s.is_empty())
    }
}

impl CorrelationSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str).filter(|s| !s.is_empty())
    }
}

/// Opaque payloads never carry a correlation id.
impl CorrelationSource for Bytes {
    fn lookup(&self, _key: &str) -> Option<&str> {
        None
    }
}

/// HTTP headers, matched case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct Headers<'a>(pub &'a HashMap<String, String>);

impl CorrelationSource for Headers<'_> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .or_else(|| {
                self.0
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(key))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Source with nothing in it; resolution always generates a new id.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCorrelation;

impl CorrelationSource for NoCorrelation {
    fn lookup(&self, _key: &str) -> Option<&str> {
        None
    }
}

/// Names under which correlation ids are looked up and propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    pub attr_name: String,
    pub header_name: String,
}

impl CorrelationConfig {
    pub fn new(attr_name: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self {
            attr_name: attr_name.into(),
            header_name: header_name.into(),
        }
    }

    /// Resolve the correlation id for one message. Never fails.
    pub fn resolve(&self, source: &dyn CorrelationSource) -> CorrelationContext {
        let current_id = source
            .lookup(&self.attr_name)
            .or_else(|| source.lookup(&self.header_name))
            .map(str::to_string)
            .unwrap_or_else(generate_correlation_id);

        CorrelationContext {
            attr_name: self.attr_name.clone(),
            header_name: self.header_name.clone(),
            current_id,
        }
    }
}

impl From<&JeffyConfig> for CorrelationConfig {
    fn from(config: &JeffyConfig) -> Self {
        Self::new(&config.correlation_attr_name, &config.correlation_id_header)
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self::from(&JeffyConfig::default())
    }
}

/// The correlation id resolved for the message being handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationContext {
    pub attr_name: String,
    pub header_name: String,
    pub current_id: String,
}

impl CorrelationContext {
    pub fn id(&self) -> &str {
        &self.current_id
    }

    /// Wrap an outbound payload as `{"<attr_name>": id, "item": payload}`.
    pub fn wrap_item(&self, item: Value) -> Value {
        let mut object = serde_json::Map::new();
        object.insert(self.attr_name.clone(), Value::from(self.current_id.as_str()));
        object.insert("item".to_string(), item);
        Value::Object(object)
    }
}

/// Fresh UUID v4 in hyphenated form.
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}
