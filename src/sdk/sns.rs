//! Publishing notifications with the correlation id attached.

use super::{encode_wrapped, Destination, MessageSink, OutboundMessage, SdkError};
use crate::correlation::CorrelationContext;
use serde_json::Value;

/// Publish `message` to a topic wrapped as `{"<attr>": id, "item": message}`.
pub async fn publish(
    sink: &dyn MessageSink,
    correlation: &CorrelationContext,
    topic_arn: &str,
    message: Value,
    subject: Option<&str>,
) -> Result<(), SdkError> {
    let body = encode_wrapped(correlation, message)?;
    sink.send(OutboundMessage {
        destination: Destination::Topic {
            topic_arn: topic_arn.to_string(),
            subject: subject.map(str::to_string),
        },
        body,
    })
    .await
}
