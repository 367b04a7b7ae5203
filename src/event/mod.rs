//! Envelopes delivered by batch event triggers.
//!
//! Every batch envelope carries an ordered `Records` array. [`split_records`]
//! turns an envelope into a consuming iterator over its raw records; each
//! source module then extracts the payload and metadata of one record.

pub mod dynamodb;
pub mod kinesis;
pub mod s3;
pub mod sns;
pub mod sqs;

use crate::error::JeffyError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Deserialize)]
struct Batch {
    #[serde(rename = "Records")]
    records: Vec<Value>,
}

/// Split a batch envelope into its records, in delivery order.
pub fn split_records(event: Value) -> Result<std::vec::IntoIter<Value>, JeffyError> {
    let batch: Batch = serde_json::from_value(event).map_err(JeffyError::Envelope)?;
    Ok(batch.records.into_iter())
}

/// Parse one raw record into its typed form.
pub(crate) fn parse_record<T: serde::de::DeserializeOwned>(record: &Value) -> Result<T, JeffyError> {
    T::deserialize(record).map_err(JeffyError::Envelope)
}

/// String-valued attributes of a JSON object, minus the `skip` keys.
pub(crate) fn string_attributes(value: &Value, skip: &[&str]) -> HashMap<String, String> {
    value
        .as_object()
        .map(|object| {
            object
                .iter()
                .filter(|(key, _)| !skip.contains(&key.as_str()))
                .filter_map(|(key, value)| Some((key.clone(), value.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_preserves_order() {
        let records: Vec<Value> =
            split_records(json!({"Records": [{"n": 1}, {"n": 2}, {"n": 3}]})).unwrap().collect();
        assert_eq!(records, vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 3})]);
    }

    #[test]
    fn test_empty_batch_yields_nothing() {
        assert_eq!(split_records(json!({"Records": []})).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_records_is_an_envelope_error() {
        let err = split_records(json!({"detail": {}})).unwrap_err();
        assert!(matches!(err, JeffyError::Envelope(_)));
    }

    #[test]
    fn test_string_attributes() {
        let attrs = string_attributes(
            &json!({"messageId": "m-1", "body": "{}", "attempts": 2, "awsRegion": "eu-west-1"}),
            &["body"],
        );
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["messageId"], "m-1");
        assert_eq!(attrs["awsRegion"], "eu-west-1");
    }
}
