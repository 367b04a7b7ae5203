//! Putting stream records with the correlation id attached.

use super::{encode_wrapped, Destination, MessageSink, OutboundMessage, SdkError};
use crate::correlation::CorrelationContext;
use serde_json::Value;

/// Put `data` on a stream wrapped as `{"<attr>": id, "item": data}`.
pub async fn put_record(
    sink: &dyn MessageSink,
    correlation: &CorrelationContext,
    stream_name: &str,
    partition_key: &str,
    data: Value,
) -> Result<(), SdkError> {
    let body = encode_wrapped(correlation, data)?;
    sink.send(OutboundMessage {
        destination: Destination::Stream {
            stream_name: stream_name.to_string(),
            partition_key: partition_key.to_string(),
        },
        body,
    })
    .await
}
