//! # Jeffy - handler decorators for serverless event triggers
//!
//! Jeffy wraps business functions so that every invocation gets the same
//! ambient behaviour regardless of the trigger that fired it:
//!
//! - a correlation id, read from the incoming message or generated, carried
//!   in every log record and propagated to outgoing messages;
//! - structured JSON logging of the inbound record, the result and any error;
//! - payload decoding through a pluggable [`Encoding`];
//! - payload validation through a pluggable [`Validator`].
//!
//! ```text
//!   event ──► split records ──► for each record:
//!                                 resolve correlation id
//!                                 log inbound record
//!                                 decode ──► validate
//!                                 call business function (once)
//!                                 log result / error
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jeffy::prelude::*;
//! use serde_json::{json, Value};
//!
//! async fn create_order(
//!     message: Message<Value>,
//!     ctx: InvocationContext,
//! ) -> Result<Value, HandlerError> {
//!     ctx.logger().info(&json!({"creating": message.body}));
//!     Ok(json!({"created": true}))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let app = App::from_env();
//!     let handler = app
//!         .handlers()
//!         .sqs(JsonEncoding, NoneValidator, handler_fn(create_order));
//!
//!     let event = json!({"Records": [{"messageId": "1", "body": "{\"id\": 7}"}]});
//!     let results = handler.invoke(event, LambdaContext::new("orders", "req-1")).await?;
//!     assert_eq!(results, json!([{"created": true}]));
//!     Ok(())
//! }
//! ```
//!
//! ## Local runtime
//!
//! [`LocalRuntime`] hosts wrapped handlers behind an HTTP endpoint shaped
//! like the Lambda invoke API, which is what the `jeffy` binary runs.

pub mod app;
pub mod config;
pub mod correlation;
pub mod encoding;
pub mod error;
pub mod event;
pub mod function;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod runtime;
pub mod sdk;
pub mod validator;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::app::{get_app, setup, App};
    pub use crate::config::JeffyConfig;
    pub use crate::correlation::CorrelationContext;
    pub use crate::encoding::{BytesEncoding, Encoding, JsonEncoding};
    pub use crate::error::{HandlerError, JeffyError};
    pub use crate::function::{handler_fn, EventFunction, InvocationContext, LambdaContext, Message};
    pub use crate::handlers::{Handler, Handlers};
    pub use crate::http::{ApiResponse, StatusCode};
    pub use crate::logging::{LogLevel, Logger};
    pub use crate::runtime::{LocalRuntime, RuntimeConfig};
    pub use crate::validator::{JsonSchemaValidator, NoneValidator, Validator};
    pub use async_trait::async_trait;
}

// Re-export for convenience
pub use app::App;
pub use config::JeffyConfig;
pub use error::{HandlerError, JeffyError};
pub use handlers::{Handler, Handlers};
pub use runtime::LocalRuntime;
