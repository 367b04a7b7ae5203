//! Uploading objects with the correlation id stored in their metadata.

use super::{ObjectStore, SdkError, StoredObject};
use crate::correlation::CorrelationContext;
use crate::event::s3::ObjectLocation;
use bytes::Bytes;
use std::collections::HashMap;

/// Upload `body`, recording the correlation id under the attribute name.
pub async fn upload(
    store: &dyn ObjectStore,
    correlation: &CorrelationContext,
    location: &ObjectLocation,
    body: impl Into<Bytes>,
) -> Result<(), SdkError> {
    let mut metadata = HashMap::new();
    metadata.insert(correlation.attr_name.clone(), correlation.current_id.clone());
    store
        .put_object(
            location,
            StoredObject {
                body: body.into(),
                metadata,
            },
        )
        .await
}
