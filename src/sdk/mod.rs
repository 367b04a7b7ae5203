//! Outbound collaborators.
//!
//! The pipeline never talks to cloud services directly. Sending messages and
//! reading or writing objects go through the [`MessageSink`] and
//! [`ObjectStore`] capabilities; retries and throttling belong to their
//! implementations. The helpers in [`sqs`], [`sns`], [`kinesis`] and [`s3`]
//! attach the current correlation id to everything that leaves the function.

pub mod kinesis;
pub mod s3;
pub mod sns;
pub mod sqs;

mod memory;

pub use memory::{MemoryMessageSink, MemoryObjectStore};

use crate::correlation::CorrelationContext;
use crate::encoding::{Encoding, JsonEncoding};
use crate::event::s3::ObjectLocation;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error reported by an outbound collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("object not found: s3://{bucket_name}/{key}")]
    ObjectNotFound { bucket_name: String, key: String },

    #[error("{service} request failed: {message}")]
    Service { service: String, message: String },

    #[error("failed to encode outbound payload: {0}")]
    Encode(String),
}

impl SdkError {
    pub fn service(service: impl Into<String>, message: impl Into<String>) -> Self {
        SdkError::Service {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Where an outbound message is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Queue { queue_url: String },
    Topic { topic_arn: String, subject: Option<String> },
    Stream { stream_name: String, partition_key: String },
}

/// A message leaving the function.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub destination: Destination,
    pub body: Bytes,
}

/// Capability to deliver outbound messages.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<(), SdkError>;
}

/// An object read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub metadata: HashMap<String, String>,
}

/// Capability to read and write stored objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, location: &ObjectLocation) -> Result<StoredObject, SdkError>;

    async fn put_object(&self, location: &ObjectLocation, object: StoredObject) -> Result<(), SdkError>;
}

/// JSON bytes of `{"<attr>": id, "item": item}`.
fn encode_wrapped(correlation: &CorrelationContext, item: Value) -> Result<Bytes, SdkError> {
    JsonEncoding
        .encode(&correlation.wrap_item(item))
        .map_err(|e| SdkError::Encode(e.to_string()))
}
