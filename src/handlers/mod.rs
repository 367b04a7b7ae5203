//! Handler wrappers, one per event source.
//!
//! A wrapper takes a business function and returns a [`Handler`]: a value
//! implementing the runtime's `event -> result` entry point. Every wrapper
//! runs the same pipeline and differs only in how it splits the event into
//! messages, where it reads the correlation id from, and how failures are
//! surfaced:
//!
//! | Source | Messages | Correlation from | Decode/validation failure |
//! |---|---|---|---|
//! | REST API | 1 | request headers | 400 response |
//! | SQS | 1 per record | decoded body | error |
//! | SNS | 1 per record | decoded message | error |
//! | S3 | 1 per record | object metadata | error |
//! | Schedule | 1 | the event | error |
//! | Kinesis | 1 per record | decoded data | error |
//! | DynamoDB streams | 1 per record | change payload | error |
//! | Common | 1 | the event | error |
//!
//! Business errors raised for an HTTP request become a generic 500 response;
//! for every other source they are returned to the runtime unchanged. In a
//! batch, the first failing record stops the batch and later records are not
//! delivered. Batch handlers return the per-record results as a JSON array.

mod pipeline;
mod rest_api;
mod s3;
mod schedule;
mod sns;
mod sqs;
mod streams;

pub use rest_api::RestApiHandler;
pub use s3::S3Handler;
pub use schedule::{CommonHandler, ScheduleHandler};
pub use sns::SnsHandler;
pub use sqs::SqsHandler;
pub use streams::{DynamoDbStreamsHandler, KinesisStreamsHandler};

pub(crate) use pipeline::Pipeline;

use crate::config::JeffyConfig;
use crate::error::JeffyError;
use crate::function::{EventSource, LambdaContext};
use crate::logging::Logger;
use crate::sdk::ObjectStore;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Entry point invoked by the hosting runtime.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle one event.
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError>;

    /// The event source this handler was wrapped for.
    fn source(&self) -> EventSource;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        (**self).invoke(event, context).await
    }

    fn source(&self) -> EventSource {
        (**self).source()
    }
}

/// Builder for source-specific handler wrappers.
#[derive(Debug, Clone)]
pub struct Handlers {
    pipeline: Pipeline,
}

impl Handlers {
    pub fn new(config: &JeffyConfig, logger: Logger) -> Self {
        Self {
            pipeline: Pipeline::new(config, logger),
        }
    }

    /// Wrap a function handling API Gateway requests.
    pub fn rest_api<E, V, F>(&self, encoding: E, validator: V, function: F) -> RestApiHandler<E, V, F> {
        RestApiHandler::new(self.pipeline.clone(), encoding, validator, function)
    }

    /// Wrap a function handling SQS batches.
    pub fn sqs<E, V, F>(&self, encoding: E, validator: V, function: F) -> SqsHandler<E, V, F> {
        SqsHandler::new(self.pipeline.clone(), encoding, validator, function)
    }

    /// Wrap a function handling SNS batches.
    pub fn sns<E, V, F>(&self, encoding: E, validator: V, function: F) -> SnsHandler<E, V, F> {
        SnsHandler::new(self.pipeline.clone(), encoding, validator, function)
    }

    /// Wrap a function handling S3 notifications; objects are read from `store`.
    pub fn s3<E, V, F>(
        &self,
        store: Arc<dyn ObjectStore>,
        encoding: E,
        validator: V,
        function: F,
    ) -> S3Handler<E, V, F> {
        S3Handler::new(self.pipeline.clone(), store, encoding, validator, function)
    }

    /// Wrap a function handling scheduled events.
    pub fn schedule<V, F>(&self, validator: V, function: F) -> ScheduleHandler<V, F> {
        ScheduleHandler::new(self.pipeline.clone(), validator, function)
    }

    /// Wrap a function handling Kinesis stream batches.
    pub fn kinesis_streams<E, V, F>(
        &self,
        encoding: E,
        validator: V,
        function: F,
    ) -> KinesisStreamsHandler<E, V, F> {
        KinesisStreamsHandler::new(self.pipeline.clone(), encoding, validator, function)
    }

    /// Wrap a function handling DynamoDB stream batches.
    pub fn dynamodb_streams<V, F>(&self, validator: V, function: F) -> DynamoDbStreamsHandler<V, F> {
        DynamoDbStreamsHandler::new(self.pipeline.clone(), validator, function)
    }

    /// Wrap a function for any other event: correlation and logging only.
    pub fn common<V, F>(&self, validator: V, function: F) -> CommonHandler<V, F> {
        CommonHandler::new(self.pipeline.clone(), validator, function)
    }
}
