use super::{Handler, Pipeline};
use crate::correlation::CorrelationSource;
use crate::encoding::Encoding;
use crate::error::JeffyError;
use crate::event::split_records;
use crate::event::sqs::SqsRecord;
use crate::function::{EventFunction, EventSource, LambdaContext};
use crate::validator::Validator;
use async_trait::async_trait;
use serde_json::Value;

/// SQS batch handler: one message per record, decoded from the record body.
pub struct SqsHandler<E, V, F> {
    pipeline: Pipeline,
    encoding: E,
    validator: V,
    function: F,
}

impl<E, V, F> SqsHandler<E, V, F> {
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
impl<E, V, F> Handler for SqsHandler<E, V, F>
where
    E: Encoding,
    E::Item: CorrelationSource,
    V: Validator<E::Item>,
    F: EventFunction<E::Item>,
{
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        let mut results = Vec::new();
        for record in split_records(event)? {
            let payload = SqsRecord::parse(&record).map(|r| r.body.into_bytes());
            let metadata = SqsRecord::metadata(&record);
            let result = self
                .pipeline
                .deliver_encoded(
                    EventSource::Sqs,
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
        EventSource::Sqs
    }
}
