use super::{Handler, Pipeline};
use crate::correlation::CorrelationSource;
use crate::encoding::Encoding;
use crate::error::JeffyError;
use crate::event::dynamodb::DynamoDbRecord;
use crate::event::kinesis::KinesisRecord;
use crate::event::split_records;
use crate::function::{EventFunction, EventSource, LambdaContext};
use crate::validator::Validator;
use async_trait::async_trait;
use serde_json::Value;

/// Kinesis stream handler: one message per record, decoded from the
/// base64 `kinesis.data` payload.
pub struct KinesisStreamsHandler<E, V, F> {
    pipeline: Pipeline,
    encoding: E,
    validator: V,
    function: F,
}

impl<E, V, F> KinesisStreamsHandler<E, V, F> {
    pub(crate) fn new(pipeline: Pipeline, encoding: E, validator: V, function: F) -> Self {
        Self {
            pipeline,
            encoding,
            validator,
            function,
        }
    }
}

#[async_trait]
impl<E, V, F> Handler for KinesisStreamsHandler<E, V, F>
where
    E: Encoding,
    E::Item: CorrelationSource,
    V: Validator<E::Item>,
    F: EventFunction<E::Item>,
{
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        let mut results = Vec::new();
        for record in split_records(event)? {
            let payload = KinesisRecord::parse(&record)
                .and_then(|r| r.payload().map_err(JeffyError::from));
            let metadata = KinesisRecord::metadata(&record);
            let result = self
                .pipeline
                .deliver_encoded(
                    EventSource::KinesisStreams,
                    &context,
                    record,
                    payload,
                    metadata,
                    &self.encoding,
                    &self.validator,
                    &self.function,
                )
                .await?;
            results.push(result);
        }
        Ok(Value::Array(results))
    }

    fn source(&self) -> EventSource {
        EventSource::KinesisStreams
    }
}

/// DynamoDB stream handler: the structured `dynamodb` change payload of each
/// record is validated and delivered as-is.
///
/// The correlation id is looked up among the top-level keys of that payload
/// only. Attributes inside `NewImage`/`OldImage` are typed values
/// (`{"correlation_id": {"S": "..."}}`) and are not searched, so a change
/// without a top-level id gets a generated one.
pub struct DynamoDbStreamsHandler<V, F> {
    pipeline: Pipeline,
    validator: V,
    function: F,
}

impl<V, F> DynamoDbStreamsHandler<V, F> {
    pub(crate) fn new(pipeline: Pipeline, validator: V, function: F) -> Self {
        Self {
            pipeline,
            validator,
            function,
        }
    }
}

#[async_trait]
impl<V, F> Handler for DynamoDbStreamsHandler<V, F>
where
    V: Validator<Value>,
    F: EventFunction<Value>,
{
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        let source = EventSource::DynamodbStreams;
        let mut results = Vec::new();
        for record in split_records(event)? {
            let change = match DynamoDbRecord::parse(&record) {
                Ok(parsed) => parsed.dynamodb,
                Err(err) => {
                    return Err(self
                        .pipeline
                        .reject_unresolved(source, &context, &record, err))
                }
            };
            let metadata = DynamoDbRecord::metadata(&record);
            let result = self
                .pipeline
                .deliver_value(
                    source,
                    &context,
                    record,
                    change,
                    metadata,
                    &self.validator,
                    &self.function,
                )
                .await?;
            results.push(result);
        }
        Ok(Value::Array(results))
    }

    fn source(&self) -> EventSource {
        EventSource::DynamodbStreams
    }
}
