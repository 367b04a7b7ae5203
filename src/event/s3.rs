//! S3 notification records.

use super::parse_record;
use crate::error::JeffyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One S3 event notification record.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Record {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Bucket and key naming a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket_name: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            key: key.into(),
        }
    }
}

impl S3Record {
    pub fn parse(record: &Value) -> Result<Self, JeffyError> {
        parse_record(record)
    }

    pub fn location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.s3.bucket.name, &self.s3.object.key)
    }
}
