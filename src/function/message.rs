//! The logical unit handed to a business function.

use crate::event::s3::{ObjectLocation, S3Record};
use serde_json::Value;
use std::collections::HashMap;

/// One decoded, validated message extracted from an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<T> {
    /// Decoded payload.
    pub body: T,
    /// Headers, object metadata or stream attributes of the source record.
    pub metadata: HashMap<String, String>,
    /// Correlation id resolved for this message.
    pub correlation_id: String,
    /// The raw record (or whole event) the message was extracted from.
    pub record: Value,
}

impl<T> Message<T> {
    pub fn new(body: T, correlation_id: impl Into<String>) -> Self {
        Self {
            body,
            metadata: HashMap::new(),
            correlation_id: correlation_id.into(),
            record: Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.record = record;
        self
    }

    pub fn get_metadata(&self, key: &str) -> Option<&String> {
        self.metadata.get(key)
    }

    /// Bucket and key when the message came from an S3 notification.
    pub fn object_location(&self) -> Option<ObjectLocation> {
        S3Record::parse(&self.record).ok().map(|record| record.location())
    }
}

impl Message<Value> {
    /// The `item` of a payload wrapped by the outbound SDK helpers.
    pub fn item(&self) -> Option<&Value> {
        self.body.get("item")
    }
}
