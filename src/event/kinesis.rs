//! Kinesis stream records.

use super::{parse_record, string_attributes};
use crate::encoding::DecodeError;
use crate::error::JeffyError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One Kinesis stream record.
#[derive(Debug, Clone, Deserialize)]
pub struct KinesisRecord {
    pub kinesis: KinesisData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisData {
    /// Base64 encoded record payload.
    pub data: String,
    #[serde(default)]
    pub partition_key: Option<String>,
    #[serde(default)]
    pub sequence_number: Option<String>,
}

impl KinesisRecord {
    pub fn parse(record: &Value) -> Result<Self, JeffyError> {
        parse_record(record)
    }

    /// Payload bytes with the base64 transport encoding removed.
    pub fn payload(&self) -> Result<Vec<u8>, DecodeError> {
        Ok(BASE64.decode(&self.kinesis.data)?)
    }

    /// Stream attributes (`partitionKey`, `sequenceNumber`, ...).
    pub fn metadata(record: &Value) -> HashMap<String, String> {
        record
            .get("kinesis")
            .map(|kinesis| string_attributes(kinesis, &["data"]))
            .unwrap_or_default()
    }
}
