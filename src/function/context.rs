//! Runtime and per-invocation contexts handed to business functions.

use crate::correlation::CorrelationContext;
use crate::logging::Logger;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Context supplied by the hosting runtime with each invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaContext {
    /// Request ID assigned by the runtime.
    pub request_id: String,
    /// Function name.
    pub function_name: String,
    /// ARN used to invoke the function, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoked_function_arn: Option<String>,
    /// Invocation deadline in Unix epoch milliseconds, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
    /// Environment variables available to the function.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl LambdaContext {
    /// Create a new runtime context.
    pub fn new(function_name: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the invocation deadline.
    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    /// Get an environment variable.
    pub fn get_env(&self, key: &str) -> Option<&String> {
        self.env.get(key)
    }
}

/// Kind of trigger a handler was wrapped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    RestApi,
    Sqs,
    Sns,
    S3,
    Schedule,
    KinesisStreams,
    DynamodbStreams,
    Common,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::RestApi => "rest_api",
            EventSource::Sqs => "sqs",
            EventSource::Sns => "sns",
            EventSource::S3 => "s3",
            EventSource::Schedule => "schedule",
            EventSource::KinesisStreams => "kinesis_streams",
            EventSource::DynamodbStreams => "dynamodb_streams",
            EventSource::Common => "common",
        }
    }
}

impl std::fmt::Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a business function needs about the message it is handling.
///
/// Built fresh for every message, so nothing in it is shared with other
/// invocations.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    lambda: LambdaContext,
    correlation: CorrelationContext,
    logger: Logger,
    source: EventSource,
}

impl InvocationContext {
    pub fn new(
        lambda: LambdaContext,
        correlation: CorrelationContext,
        logger: Logger,
        source: EventSource,
    ) -> Self {
        Self {
            lambda,
            correlation,
            logger,
            source,
        }
    }

    pub fn lambda(&self) -> &LambdaContext {
        &self.lambda
    }

    pub fn correlation(&self) -> &CorrelationContext {
        &self.correlation
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation.current_id
    }

    /// Logger whose records carry this message's correlation id.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn source(&self) -> EventSource {
        self.source
    }

    /// Wrap an outbound payload with this message's correlation id.
    pub fn wrap_item(&self, item: Value) -> Value {
        self.correlation.wrap_item(item)
    }
}
