//! Jeffy local runtime.
//!
//! Hosts two demo handlers behind the Lambda-style invoke endpoint:
//!
//! ```text
//! curl -X POST localhost:9001/2015-03-31/functions/echo/invocations \
//!   -d '{"httpMethod":"POST","path":"/","headers":{},"body":"{\"name\":\"jeffy\"}"}'
//! curl -X POST localhost:9001/2015-03-31/functions/orders/invocations \
//!   -d '{"Records":[{"messageId":"1","body":"{\"order_id\":7}"}]}'
//! ```

use jeffy::logging::init_tracing;
use jeffy::prelude::*;
use serde_json::{json, Value};

/// Echoes the decoded request body back as JSON.
async fn echo(message: Message<Option<Value>>, ctx: InvocationContext) -> Result<Value, HandlerError> {
    let body = json!({
        "received": message.body,
        "correlation_id": ctx.correlation_id(),
        "request_id": ctx.lambda().request_id,
    });
    Ok(ApiResponse::json(&body)?.into_value())
}

/// Logs each order; rejects orders without an id.
async fn process_order(message: Message<Value>, ctx: InvocationContext) -> Result<Value, HandlerError> {
    let order_id = message
        .body
        .get("order_id")
        .and_then(Value::as_i64)
        .ok_or("order_id missing")?;
    ctx.logger().info(&json!({"processing_order": order_id}));
    Ok(json!({"order_id": order_id, "status": "accepted"}))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = JeffyConfig::from_env();
    init_tracing(config.log_level);

    let app = setup(config);
    let handlers = app.handlers();

    let order_schema = JsonSchemaValidator::new(json!({
        "type": "object",
        "required": ["order_id"],
        "properties": {"order_id": {"type": "integer"}}
    }))?;

    let runtime = LocalRuntime::new(RuntimeConfig::new().env("ENVIRONMENT", "development"));
    runtime
        .register(
            "echo",
            handlers
                .rest_api(JsonEncoding, NoneValidator, handler_fn(echo))
                .with_response_headers([("Access-Control-Allow-Origin", "*")]),
        )
        .await?;
    runtime
        .register(
            "orders",
            handlers.sqs(JsonEncoding, order_schema, handler_fn(process_order)),
        )
        .await?;

    tracing::info!("Registered functions: echo, orders");
    runtime.run().await?;
    Ok(())
}
