//! SQS batch records.

use super::{parse_record, string_attributes};
use crate::error::JeffyError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One SQS message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqsRecord {
    pub body: String,
    #[serde(default)]
    pub message_id: Option<String>,
}

impl SqsRecord {
    pub fn parse(record: &Value) -> Result<Self, JeffyError> {
        parse_record(record)
    }

    /// Record attributes other than the body (`messageId`, `eventSourceARN`, ...).
    pub fn metadata(record: &Value) -> HashMap<String, String> {
        string_attributes(record, &["body"])
    }
}
