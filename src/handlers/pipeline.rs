//! The orchestration shared by every event source.
//!
//! For each message: resolve the correlation id, log the inbound record,
//! decode and validate the payload, invoke the business function exactly
//! once, then log the result or the error. Source handlers only decide where
//! the payload and the correlation id come from and how failures surface.

use crate::config::JeffyConfig;
use crate::correlation::{CorrelationConfig, CorrelationSource, NoCorrelation};
use crate::encoding::Encoding;
use crate::error::JeffyError;
use crate::function::{EventFunction, EventSource, InvocationContext, LambdaContext, Message};
use crate::logging::Logger;
use crate::validator::Validator;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(crate) struct Pipeline {
    correlation: CorrelationConfig,
    logger: Logger,
}

impl Pipeline {
    pub(crate) fn new(config: &JeffyConfig, logger: Logger) -> Self {
        Self {
            correlation: CorrelationConfig::from(config),
            logger,
        }
    }

    /// Resolve the correlation id and emit the inbound record.
    pub(crate) fn start(
        &self,
        source: EventSource,
        lookup: &dyn CorrelationSource,
        lambda: &LambdaContext,
        raw: &Value,
    ) -> InvocationContext {
        let correlation = self.correlation.resolve(lookup);
        let logger = self.logger.with_context([(
            correlation.attr_name.clone(),
            correlation.current_id.clone(),
        )]);
        logger.info(raw);
        InvocationContext::new(lambda.clone(), correlation, logger, source)
    }

    /// Log a failure that happened before the business function ran.
    pub(crate) fn reject(&self, ctx: &InvocationContext, err: JeffyError) -> JeffyError {
        ctx.logger().exception(&err);
        err
    }

    /// Reject a record whose correlation id could not be read because the
    /// record itself was unusable.
    pub(crate) fn reject_unresolved(
        &self,
        source: EventSource,
        lambda: &LambdaContext,
        raw: &Value,
        err: JeffyError,
    ) -> JeffyError {
        let ctx = self.start(source, &NoCorrelation, lambda, raw);
        self.reject(&ctx, err)
    }

    /// Invoke the business function and log its outcome.
    pub(crate) async fn invoke<T, F>(
        &self,
        function: &F,
        message: Message<T>,
        ctx: InvocationContext,
    ) -> Result<Value, JeffyError>
    where
        T: Send + 'static,
        F: EventFunction<T> + ?Sized,
    {
        let logger = ctx.logger().clone();
        match function.call(message, ctx).await {
            Ok(result) => {
                logger.info(&result);
                Ok(result)
            }
            Err(err) => {
                logger.exception(&*err);
                Err(JeffyError::Handler(err))
            }
        }
    }

    /// Deliver a record whose payload is correlated by its own decoded body.
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn deliver_encoded<E, V, F>(
        &self,
        source: EventSource,
        lambda: &LambdaContext,
        record: Value,
        payload: Result<Vec<u8>, JeffyError>,
        metadata: HashMap<String, String>,
        encoding: &E,
        validator: &V,
        function: &F,
    ) -> Result<Value, JeffyError>
    where
        E: Encoding,
        E::Item: CorrelationSource,
        V: Validator<E::Item>,
        F: EventFunction<E::Item>,
    {
        let decoded = payload.and_then(|bytes| encoding.decode(&bytes).map_err(JeffyError::from));
        let body = match decoded {
            Ok(body) => body,
            Err(err) => return Err(self.reject_unresolved(source, lambda, &record, err)),
        };

        let ctx = self.start(source, &body, lambda, &record);
        if let Err(err) = validator.validate(&body) {
            return Err(self.reject(&ctx, err.into()));
        }

        let message = Message::new(body, ctx.correlation_id())
            .with_metadata(metadata)
            .with_record(record);
        self.invoke(function, message, ctx).await
    }

    /// Deliver an already structured payload, correlated by the payload itself.
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn deliver_value<V, F>(
        &self,
        source: EventSource,
        lambda: &LambdaContext,
        record: Value,
        body: Value,
        metadata: HashMap<String, String>,
        validator: &V,
        function: &F,
    ) -> Result<Value, JeffyError>
    where
        V: Validator<Value>,
        F: EventFunction<Value>,
    {
        let ctx = self.start(source, &body, lambda, &record);
        if let Err(err) = validator.validate(&body) {
            return Err(self.reject(&ctx, err.into()));
        }

        let message = Message::new(body, ctx.correlation_id())
            .with_metadata(metadata)
            .with_record(record);
        self.invoke(function, message, ctx).await
    }
}
