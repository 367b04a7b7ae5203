use super::{Handler, Pipeline};
use crate::error::JeffyError;
use crate::function::{EventFunction, EventSource, LambdaContext};
use crate::validator::Validator;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Scheduled event handler.
///
/// The whole event is the message: it is validated as-is (no decoding) and
/// the correlation id is read from it.
pub struct ScheduleHandler<V, F> {
    pipeline: Pipeline,
    validator: V,
    function: F,
}

impl<V, F> ScheduleHandler<V, F> {
    pub(crate) fn new(pipeline: Pipeline, validator: V, function: F) -> Self {
        Self {
            pipeline,
            validator,
            function,
        }
    }
}

#[async_trait]
impl<V, F> Handler for ScheduleHandler<V, F>
where
    V: Validator<Value>,
    F: EventFunction<Value>,
{
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        let record = event.clone();
        self.pipeline
            .deliver_value(
                EventSource::Schedule,
                &context,
                record,
                event,
                HashMap::new(),
                &self.validator,
                &self.function,
            )
            .await
    }

    fn source(&self) -> EventSource {
        EventSource::Schedule
    }
}

/// Handler for events of any other shape; adds correlation and logging only.
pub struct CommonHandler<V, F> {
    pipeline: Pipeline,
    validator: V,
    function: F,
}

impl<V, F> CommonHandler<V, F> {
    pub(crate) fn new(pipeline: Pipeline, validator: V, function: F) -> Self {
        Self {
            pipeline,
            validator,
            function,
        }
    }
}

#[async_trait]
impl<V, F> Handler for CommonHandler<V, F>
where
    V: Validator<Value>,
    F: EventFunction<Value>,
{
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        let record = event.clone();
        self.pipeline
            .deliver_value(
                EventSource::Common,
                &context,
                record,
                event,
                HashMap::new(),
                &self.validator,
                &self.function,
            )
            .await
    }

    fn source(&self) -> EventSource {
        EventSource::Common
    }
}
