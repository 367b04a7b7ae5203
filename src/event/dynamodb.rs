//! DynamoDB stream records.

use super::{parse_record, string_attributes};
use crate::error::JeffyError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One DynamoDB stream record; `dynamodb` holds the change payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamoDbRecord {
    pub dynamodb: Value,
    #[serde(default)]
    pub event_name: Option<String>,
}

impl DynamoDbRecord {
    pub fn parse(record: &Value) -> Result<Self, JeffyError> {
        parse_record(record)
    }

    /// Record attributes (`eventID`, `eventName`, `eventSourceARN`, ...).
    pub fn metadata(record: &Value) -> HashMap<String, String> {
        string_attributes(record, &["dynamodb"])
    }
}
