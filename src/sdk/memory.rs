//! In-memory collaborators for local runs and tests.

use super::{MessageSink, ObjectStore, OutboundMessage, SdkError, StoredObject};
use crate::event::s3::ObjectLocation;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Records every message it is asked to send.
#[derive(Debug, Clone, Default)]
pub struct MemoryMessageSink {
    sent: Arc<RwLock<Vec<OutboundMessage>>>,
}

impl MemoryMessageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, in order.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl MessageSink for MemoryMessageSink {
    async fn send(&self, message: OutboundMessage) -> Result<(), SdkError> {
        self.sent.write().await.push(message);
        Ok(())
    }
}

/// Object storage held in a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<ObjectLocation, StoredObject>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, location: &ObjectLocation) -> Result<StoredObject, SdkError> {
        self.objects
            .read()
            .await
            .get(location)
            .cloned()
            .ok_or_else(|| SdkError::ObjectNotFound {
                bucket_name: location.bucket_name.clone(),
                key: location.key.clone(),
            })
    }

    async fn put_object(&self, location: &ObjectLocation, object: StoredObject) -> Result<(), SdkError> {
        self.objects.write().await.insert(location.clone(), object);
        Ok(())
    }
}
