//! Sending queue messages with the correlation id attached.

use super::{encode_wrapped, Destination, MessageSink, OutboundMessage, SdkError};
use crate::correlation::CorrelationContext;
use serde_json::Value;

/// Send `message` to a queue wrapped as `{"<attr>": id, "item": message}`.
pub async fn send_message(
    sink: &dyn MessageSink,
    correlation: &CorrelationContext,
    queue_url: &str,
    message: Value,
) -> Result<(), SdkError> {
    let body = encode_wrapped(correlation, message)?;
    sink.send(OutboundMessage {
        destination: Destination::Queue {
            queue_url: queue_url.to_string(),
        },
        body,
    })
    .await
}
