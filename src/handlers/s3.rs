use super::{Handler, Pipeline};
use crate::encoding::Encoding;
use crate::error::JeffyError;
use crate::event::s3::S3Record;
use crate::event::split_records;
use crate::function::{EventFunction, EventSource, LambdaContext, Message};
use crate::sdk::ObjectStore;
use crate::validator::Validator;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// S3 notification handler.
///
/// Each record names an object, which is fetched from the store; the
/// correlation id is read from the object metadata and the object body is
/// decoded and validated. A failed fetch is not retried and stops the batch.
pub struct S3Handler<E, V, F> {
    pipeline: Pipeline,
    store: Arc<dyn ObjectStore>,
    encoding: E,
    validator: V,
    function: F,
}

impl<E, V, F> S3Handler<E, V, F> {
    pub(crate) fn new(
        pipeline: Pipeline,
        store: Arc<dyn ObjectStore>,
        encoding: E,
        validator: V,
        function: F,
    ) -> Self {
        Self {
            pipeline,
            store,
            encoding,
            validator,
            function,
        }
    }

    async fn deliver(&self, context: &LambdaContext, record: Value) -> Result<Value, JeffyError>
    where
        E: Encoding,
        V: Validator<E::Item>,
        F: EventFunction<E::Item>,
    {
        let source = EventSource::S3;
        let location = match S3Record::parse(&record) {
            Ok(parsed) => parsed.location(),
            Err(err) => return Err(self.pipeline.reject_unresolved(source, context, &record, err)),
        };

        let object = match self.store.get_object(&location).await {
            Ok(object) => object,
            Err(err) => {
                return Err(self
                    .pipeline
                    .reject_unresolved(source, context, &record, JeffyError::Fetch(err)))
            }
        };

        let ctx = self.pipeline.start(source, &object.metadata, context, &record);
        let decoded = self
            .encoding
            .decode(&object.body)
            .map_err(JeffyError::from)
            .and_then(|body| {
                self.validator.validate(&body)?;
                Ok(body)
            });
        let body = match decoded {
            Ok(body) => body,
            Err(err) => return Err(self.pipeline.reject(&ctx, err)),
        };

        let message = Message::new(body, ctx.correlation_id())
            .with_metadata(object.metadata)
            .with_record(record);
        self.pipeline.invoke(&self.function, message, ctx).await
    }
}

#[async_trait]
impl<E, V, F> Handler for S3Handler<E, V, F>
where
    E: Encoding,
    V: Validator<E::Item>,
    F: EventFunction<E::Item>,
{
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        let mut results = Vec::new();
        for record in split_records(event)? {
            results.push(self.deliver(&context, record).await?);
        }
        Ok(Value::Array(results))
    }

    fn source(&self) -> EventSource {
        EventSource::S3
    }
}
