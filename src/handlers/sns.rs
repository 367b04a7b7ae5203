use super::{Handler, Pipeline};
use crate::correlation::CorrelationSource;
use crate::encoding::Encoding;
use crate::error::JeffyError;
use crate::event::sns::SnsRecord;
use crate::event::split_records;
use crate::function::{EventFunction, EventSource, LambdaContext};
use crate::validator::Validator;
use async_trait::async_trait;
use serde_json::Value;

/// SNS batch handler: one message per record, decoded from `Sns.Message`.
pub struct SnsHandler<E, V, F> {
    pipeline: Pipeline,
    encoding: E,
    validator: V,
    function: F,
}

impl<E, V, F> SnsHandler<E, V, F> {
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
impl<E, V, F> Handler for SnsHandler<E, V, F>
where
    E: Encoding,
    E::Item: CorrelationSource,
    V: Validator<E::Item>,
    F: EventFunction<E::Item>,
{
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        let mut results = Vec::new();
        for record in split_records(event)? {
            let payload = SnsRecord::parse(&record).map(|r| r.sns.message.into_bytes());
            let metadata = SnsRecord::metadata(&record);
            let result = self
                .pipeline
                .deliver_encoded(
                    EventSource::Sns,
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
        EventSource::Sns
    }
}
