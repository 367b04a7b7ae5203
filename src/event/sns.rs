//! SNS batch records.

use super::{parse_record, string_attributes};
use crate::error::JeffyError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One SNS notification record.
#[derive(Debug, Clone, Deserialize)]
pub struct SnsRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

/// The notification wrapped in an SNS record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsMessage {
    pub message: String,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub topic_arn: Option<String>,
}

impl SnsRecord {
    pub fn parse(record: &Value) -> Result<Self, JeffyError> {
        parse_record(record)
    }

    /// Notification attributes other than the message itself.
    pub fn metadata(record: &Value) -> HashMap<String, String> {
        record
            .get("Sns")
            .map(|sns| string_attributes(sns, &["Message"]))
            .unwrap_or_default()
    }
}
