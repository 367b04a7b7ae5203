//! Integration tests for the handler wrappers.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use jeffy::config::RuntimeEnvironment;
use jeffy::event::s3::ObjectLocation;
use jeffy::http::ApiRequest;
use jeffy::logging::MemorySink;
use jeffy::prelude::*;
use jeffy::sdk::{self, MemoryMessageSink, MemoryObjectStore, ObjectStore};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};

const HEADER: &str = "x-jeffy-correlation-id";

fn app() -> (App, MemorySink) {
    let sink = MemorySink::new();
    let app = App::with_environment(JeffyConfig::new(), RuntimeEnvironment::default())
        .with_log_sink(Arc::new(sink.clone()));
    (app, sink)
}

fn lambda() -> LambdaContext {
    LambdaContext::new("test-function", "req-1")
}

fn is_uuid(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

/// Business error raised by test functions.
#[derive(Debug)]
struct OrderRejected(i64);

impl std::fmt::Display for OrderRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order {} rejected", self.0)
    }
}

impl std::error::Error for OrderRejected {}

async fn echo_body(message: Message<Option<Value>>, ctx: InvocationContext) -> Result<Value, HandlerError> {
    let body = json!({"received": message.body, "correlation_id": ctx.correlation_id()});
    Ok(ApiResponse::json(&body)?.into_value())
}

/// Records `(body, correlation id)` for every call.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<(Value, String)>>>,
}

impl Recorder {
    fn calls(&self) -> Vec<(Value, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn function(&self) -> impl EventFunction<Value> {
        let calls = self.calls.clone();
        handler_fn(move |message: Message<Value>, ctx: InvocationContext| {
            calls
                .lock()
                .unwrap()
                .push((message.body.clone(), ctx.correlation_id().to_string()));
            std::future::ready(Ok(json!({"seen": message.body})))
        })
    }
}

fn api_event(request: ApiRequest) -> Value {
    serde_json::to_value(request).unwrap()
}

fn sqs_event(bodies: &[Value]) -> Value {
    let records: Vec<Value> = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            json!({
                "messageId": format!("msg-{}", i),
                "body": body.to_string(),
                "eventSource": "aws:sqs"
            })
        })
        .collect();
    json!({ "Records": records })
}

// REST API

#[tokio::test]
async fn test_rest_api_propagates_correlation_header() {
    let (app, sink) = app();
    let handler = app
        .handlers()
        .rest_api(JsonEncoding, NoneValidator, handler_fn(echo_body));

    let event = api_event(
        ApiRequest::new("POST", "/orders")
            .header(HEADER, "abc")
            .body("{\"a\": 1}"),
    );
    let response = assert_ok!(handler.invoke(event, lambda()).await);

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["headers"][HEADER], "abc");
    let body: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, json!({"received": {"a": 1}, "correlation_id": "abc"}));

    let records = sink.records();
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.context_str("correlation_id") == Some("abc")));
}

#[tokio::test]
async fn test_rest_api_header_lookup_ignores_case() {
    let (app, _sink) = app();
    let handler = app
        .handlers()
        .rest_api(JsonEncoding, NoneValidator, handler_fn(echo_body));

    let event = json!({"headers": {"X-Jeffy-Correlation-Id": "MiXeD"}, "body": null});
    let response = handler.invoke(event, lambda()).await.unwrap();
    assert_eq!(response["headers"][HEADER], "MiXeD");
}

#[tokio::test]
async fn test_rest_api_generates_correlation_id() {
    let (app, _sink) = app();
    let handler = app
        .handlers()
        .rest_api(JsonEncoding, NoneValidator, handler_fn(echo_body));

    let response = handler
        .invoke(json!({"httpMethod": "GET", "path": "/"}), lambda())
        .await
        .unwrap();
    let id = response["headers"][HEADER].as_str().unwrap();
    assert!(is_uuid(id));
    let body: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["received"], Value::Null);
}

#[tokio::test]
async fn test_rest_api_invalid_json_is_bad_request() {
    let (app, sink) = app();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let handler = app.handlers().rest_api(
        JsonEncoding,
        NoneValidator,
        handler_fn(move |_message: Message<Option<Value>>, _ctx: InvocationContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, HandlerError>(json!({"statusCode": 200})) }
        }),
    );

    let event = api_event(ApiRequest::new("POST", "/orders").header(HEADER, "bad-1").body("not-json"));
    let response = assert_ok!(handler.invoke(event, lambda()).await);

    assert_eq!(response["statusCode"], 400);
    assert_eq!(response["headers"][HEADER], "bad-1");
    let body: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
    assert!(!body["error_message"].as_str().unwrap().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(sink.records_at(LogLevel::Error).len(), 1);
}

#[tokio::test]
async fn test_rest_api_schema_violation_is_bad_request() {
    let (app, _sink) = app();
    let schema = JsonSchemaValidator::new(json!({
        "type": "object",
        "required": ["name"],
        "properties": {"name": {"type": "string"}}
    }))
    .unwrap();
    let handler = app
        .handlers()
        .rest_api(JsonEncoding, schema, handler_fn(echo_body))
        .with_response_headers([("Access-Control-Allow-Origin", "*")]);

    let response = handler
        .invoke(json!({"body": "{\"name\": 42}"}), lambda())
        .await
        .unwrap();

    assert_eq!(response["statusCode"], 400);
    assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
    let body: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
    assert!(body["error_message"].as_str().unwrap().contains("42"));

    let ok = handler
        .invoke(json!({"body": "{\"name\": \"jeffy\"}"}), lambda())
        .await
        .unwrap();
    assert_eq!(ok["statusCode"], 200);
    assert!(ok["headers"].get("Access-Control-Allow-Origin").is_none());
}

#[tokio::test]
async fn test_rest_api_base64_body() {
    let (app, _sink) = app();
    let handler = app
        .handlers()
        .rest_api(JsonEncoding, NoneValidator, handler_fn(echo_body));

    let event = json!({
        "body": BASE64.encode(b"{\"b\": true}"),
        "isBase64Encoded": true
    });
    let response = handler.invoke(event, lambda()).await.unwrap();
    let body: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["received"], json!({"b": true}));
}

#[tokio::test]
async fn test_rest_api_business_error_is_internal_error() {
    let (app, sink) = app();
    let handler = app.handlers().rest_api(
        JsonEncoding,
        NoneValidator,
        handler_fn(|_message: Message<Option<Value>>, _ctx: InvocationContext| async {
            Err::<Value, HandlerError>(Box::new(OrderRejected(9)))
        }),
    );

    let response = handler
        .invoke(
            api_event(ApiRequest::new("PUT", "/orders/9").header(HEADER, "err-1").body("{}")),
            lambda(),
        )
        .await
        .unwrap();

    assert_eq!(response["statusCode"], 500);
    assert_eq!(response["headers"][HEADER], "err-1");
    assert_eq!(response["body"], json!({"error_message": "Internal Server Error"}).to_string());

    let errors = sink.records_at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message["error_message"], "order 9 rejected");
}

#[tokio::test]
async fn test_rest_api_bytes_encoding() {
    let (app, _sink) = app();
    let handler = app.handlers().rest_api(
        BytesEncoding,
        NoneValidator,
        handler_fn(|message: Message<Option<bytes::Bytes>>, _ctx: InvocationContext| async move {
            let len = message.body.map(|b| b.len()).unwrap_or_default();
            Ok::<_, HandlerError>(ApiResponse::text(len.to_string()).into_value())
        }),
    );

    let response = handler.invoke(json!({"body": "raw text"}), lambda()).await.unwrap();
    assert_eq!(response["body"], "8");
    assert!(response["headers"].get(HEADER).is_some());
}

// SQS

#[tokio::test]
async fn test_sqs_records_in_order_with_own_ids() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .sqs(JsonEncoding, NoneValidator, recorder.function());

    let event = sqs_event(&[json!({"correlation_id": "c1", "n": 1}), json!({"n": 2})]);
    let results = assert_ok!(handler.invoke(event, lambda()).await);

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0["n"], 1);
    assert_eq!(calls[0].1, "c1");
    assert_eq!(calls[1].0["n"], 2);
    assert_ne!(calls[1].1, "c1");
    assert!(is_uuid(&calls[1].1));
    assert_eq!(results.as_array().map(Vec::len), Some(2));
    assert_eq!(results[1]["seen"]["n"], 2);
}

#[tokio::test]
async fn test_sqs_business_error_propagates() {
    let (app, sink) = app();
    let handler = app.handlers().sqs(
        JsonEncoding,
        NoneValidator,
        handler_fn(|message: Message<Value>, _ctx: InvocationContext| async move {
            let order = message.body["order"].as_i64().unwrap_or_default();
            Err::<Value, HandlerError>(Box::new(OrderRejected(order)))
        }),
    );

    let event = sqs_event(&[json!({"correlation_id": "d-1", "order": 7})]);
    let err = assert_err!(handler.invoke(event, lambda()).await);

    assert!(err.is_handler_error());
    assert_eq!(err.to_string(), "order 7 rejected");
    let business = err.into_handler_error().unwrap();
    let rejected = business.downcast::<OrderRejected>().unwrap();
    assert_eq!(rejected.0, 7);

    let errors = sink.records_at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].context_str("correlation_id"), Some("d-1"));
}

#[tokio::test]
async fn test_sqs_batch_stops_at_first_failure() {
    let (app, sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .sqs(JsonEncoding, NoneValidator, recorder.function());

    let event = json!({"Records": [
        {"messageId": "1", "body": "{\"n\": 1}"},
        {"messageId": "2", "body": "{broken"},
        {"messageId": "3", "body": "{\"n\": 3}"}
    ]});
    let err = handler.invoke(event, lambda()).await.unwrap_err();

    assert!(matches!(err, JeffyError::Decode(_)));
    assert_eq!(recorder.calls().len(), 1);
    let errors = sink.records_at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(is_uuid(errors[0].context_str("correlation_id").unwrap()));
}

#[tokio::test]
async fn test_sqs_business_error_stops_later_records() {
    let (app, _sink) = app();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = calls.clone();
    let handler = app.handlers().sqs(
        JsonEncoding,
        NoneValidator,
        handler_fn(move |message: Message<Value>, _ctx: InvocationContext| {
            seen.lock().unwrap().push(message.body.clone());
            let result = if message.body["n"] == 1 {
                Err::<Value, HandlerError>("boom".into())
            } else {
                Ok(json!("done"))
            };
            std::future::ready(result)
        }),
    );

    let err = assert_err!(
        handler
            .invoke(sqs_event(&[json!({"n": 1}), json!({"n": 2})]), lambda())
            .await
    );

    assert!(err.is_handler_error());
    assert_eq!(err.to_string(), "boom");
    assert_eq!(*calls.lock().unwrap(), vec![json!({"n": 1})]);
}

#[tokio::test]
async fn test_sqs_validation_failure() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let schema = JsonSchemaValidator::new(json!({"type": "object", "required": ["n"]})).unwrap();
    let handler = app.handlers().sqs(JsonEncoding, schema, recorder.function());

    let err = handler
        .invoke(sqs_event(&[json!({"m": 1})]), lambda())
        .await
        .unwrap_err();

    assert!(matches!(err, JeffyError::Validation(_)));
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_empty_batch_invokes_nothing() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .sqs(JsonEncoding, NoneValidator, recorder.function());

    let results = handler.invoke(json!({"Records": []}), lambda()).await.unwrap();
    assert_eq!(results, json!([]));
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_missing_records_is_envelope_error() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .sqs(JsonEncoding, NoneValidator, recorder.function());

    let err = handler.invoke(json!({"detail": {}}), lambda()).await.unwrap_err();
    assert!(matches!(err, JeffyError::Envelope(_)));
}

#[tokio::test]
async fn test_outbound_message_roundtrip_keeps_correlation() {
    let (app, _sink) = app();
    let outbox = Arc::new(MemoryMessageSink::new());
    let sink = outbox.clone();
    let handler = app.handlers().sqs(
        JsonEncoding,
        NoneValidator,
        handler_fn(move |message: Message<Value>, ctx: InvocationContext| {
            let sink = sink.clone();
            async move {
                sdk::sqs::send_message(&*sink, ctx.correlation(), "https://queue/next", message.body)
                    .await?;
                Ok::<_, HandlerError>(Value::Null)
            }
        }),
    );

    handler
        .invoke(sqs_event(&[json!({"correlation_id": "flow-1", "step": 1})]), lambda())
        .await
        .unwrap();

    let sent = outbox.sent().await;
    assert_eq!(sent.len(), 1);

    // The wrapped payload correlates the downstream consumer.
    let recorder = Recorder::default();
    let next = app
        .handlers()
        .sqs(JsonEncoding, NoneValidator, recorder.function());
    let forwarded: Value = serde_json::from_slice(&sent[0].body).unwrap();
    next.invoke(sqs_event(&[forwarded]), lambda()).await.unwrap();

    let calls = recorder.calls();
    assert_eq!(calls[0].1, "flow-1");
    assert_eq!(calls[0].0["item"]["step"], 1);
}

// SNS

#[tokio::test]
async fn test_sns_uses_message() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .sns(JsonEncoding, NoneValidator, recorder.function());

    let event = json!({"Records": [{
        "EventSource": "aws:sns",
        "Sns": {
            "MessageId": "m-1",
            "TopicArn": "arn:aws:sns:us-east-1:123:topic",
            "Subject": null,
            "Message": "{\"correlation_id\": \"sns-1\", \"hello\": \"world\"}"
        }
    }]});
    handler.invoke(event, lambda()).await.unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0["hello"], "world");
    assert_eq!(calls[0].1, "sns-1");
}

// S3

fn s3_event(bucket: &str, key: &str) -> Value {
    json!({"Records": [{
        "eventSource": "aws:s3",
        "s3": {"bucket": {"name": bucket}, "object": {"key": key, "size": 2}}
    }]})
}

#[tokio::test]
async fn test_s3_reads_object_and_metadata_correlation() {
    let (app, _sink) = app();
    let store = Arc::new(MemoryObjectStore::new());
    let location = ObjectLocation::new("uploads", "in/order.json");
    let correlation = jeffy::correlation::CorrelationConfig::default()
        .resolve(&json!({"correlation_id": "s3-1"}));
    sdk::s3::upload(&*store, &correlation, &location, "{\"total\": 10}")
        .await
        .unwrap();

    let seen = Arc::new(Mutex::new(None));
    let captured = seen.clone();
    let handler = app.handlers().s3(
        store.clone(),
        JsonEncoding,
        NoneValidator,
        handler_fn(move |message: Message<Value>, ctx: InvocationContext| {
            *captured.lock().unwrap() = Some((
                message.body.clone(),
                ctx.correlation_id().to_string(),
                message.object_location(),
            ));
            async { Ok::<_, HandlerError>(json!("stored")) }
        }),
    );

    let results = handler
        .invoke(s3_event("uploads", "in/order.json"), lambda())
        .await
        .unwrap();
    assert_eq!(results, json!(["stored"]));

    let (body, id, object) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(body, json!({"total": 10}));
    assert_eq!(id, "s3-1");
    assert_eq!(object, Some(location));
}

#[tokio::test]
async fn test_s3_missing_object_is_fetch_error() {
    let (app, sink) = app();
    let recorder = Recorder::default();
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::new());
    let handler = app
        .handlers()
        .s3(store, JsonEncoding, NoneValidator, recorder.function());

    let err = handler
        .invoke(s3_event("uploads", "missing.json"), lambda())
        .await
        .unwrap_err();

    assert!(matches!(err, JeffyError::Fetch(_)));
    assert!(err.to_string().contains("s3://uploads/missing.json"));
    assert!(recorder.calls().is_empty());
    assert_eq!(sink.records_at(LogLevel::Error).len(), 1);
}

#[tokio::test]
async fn test_s3_fetch_failure_stops_later_records() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let store = Arc::new(MemoryObjectStore::new());
    let present = ObjectLocation::new("uploads", "ok2.json");
    let correlation = jeffy::correlation::CorrelationConfig::default().resolve(&json!({}));
    sdk::s3::upload(&*store, &correlation, &present, "{\"n\": 2}")
        .await
        .unwrap();
    let handler = app
        .handlers()
        .s3(store, JsonEncoding, NoneValidator, recorder.function());

    let event = json!({"Records": [
        {"eventSource": "aws:s3", "s3": {"bucket": {"name": "uploads"}, "object": {"key": "missing.json"}}},
        {"eventSource": "aws:s3", "s3": {"bucket": {"name": "uploads"}, "object": {"key": "ok2.json"}}}
    ]});
    let err = assert_err!(handler.invoke(event, lambda()).await);

    assert!(matches!(err, JeffyError::Fetch(_)));
    assert!(recorder.calls().is_empty());
}

// Streams

#[tokio::test]
async fn test_kinesis_decodes_base64_data() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .kinesis_streams(JsonEncoding, NoneValidator, recorder.function());

    let data = BASE64.encode(b"{\"correlation_id\": \"k-1\", \"clicks\": 3}");
    let event = json!({"Records": [{
        "eventSource": "aws:kinesis",
        "kinesis": {"data": data, "partitionKey": "user-1", "sequenceNumber": "1"}
    }]});
    handler.invoke(event, lambda()).await.unwrap();

    let calls = recorder.calls();
    assert_eq!(calls[0].0["clicks"], 3);
    assert_eq!(calls[0].1, "k-1");
}

#[tokio::test]
async fn test_kinesis_invalid_base64_is_decode_error() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .kinesis_streams(JsonEncoding, NoneValidator, recorder.function());

    let event = json!({"Records": [{"kinesis": {"data": "%%%"}}]});
    let err = handler.invoke(event, lambda()).await.unwrap_err();
    assert!(matches!(err, JeffyError::Decode(_)));
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_dynamodb_streams_delivers_change() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .dynamodb_streams(NoneValidator, recorder.function());

    let event = json!({"Records": [
        {"eventID": "1", "eventName": "INSERT", "dynamodb": {"Keys": {"Id": {"N": "1"}}}},
        {"eventID": "2", "eventName": "MODIFY", "dynamodb": {"Keys": {"Id": {"N": "2"}}}}
    ]});
    let results = handler.invoke(event, lambda()).await.unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0["Keys"]["Id"]["N"], "2");
    assert_ne!(calls[0].1, calls[1].1);
    assert_eq!(results.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_dynamodb_correlation_reads_top_level_only() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let handler = app
        .handlers()
        .dynamodb_streams(NoneValidator, recorder.function());

    let event = json!({"Records": [
        {"eventName": "INSERT", "dynamodb": {"correlation_id": "ddb-1", "Keys": {"Id": {"N": "1"}}}},
        {"eventName": "INSERT", "dynamodb": {"NewImage": {"correlation_id": {"S": "nested"}}}}
    ]});
    handler.invoke(event, lambda()).await.unwrap();

    let calls = recorder.calls();
    assert_eq!(calls[0].1, "ddb-1");
    assert_ne!(calls[1].1, "nested");
    assert!(is_uuid(&calls[1].1));
}

// Schedule and generic events

#[tokio::test]
async fn test_schedule_event_is_the_message() {
    let (app, sink) = app();
    let recorder = Recorder::default();
    let handler = app.handlers().schedule(NoneValidator, recorder.function());

    let event = json!({
        "source": "aws.events",
        "detail-type": "Scheduled Event",
        "correlation_id": "cron-1"
    });
    let result = handler.invoke(event.clone(), lambda()).await.unwrap();

    assert_eq!(result, json!({"seen": event}));
    assert_eq!(recorder.calls()[0].1, "cron-1");
    let inbound = &sink.records()[0];
    assert_eq!(inbound.level, LogLevel::Info);
    assert_eq!(inbound.message, event);
}

#[tokio::test]
async fn test_common_handler_validates_event() {
    let (app, _sink) = app();
    let recorder = Recorder::default();
    let schema = JsonSchemaValidator::new(json!({"type": "object", "required": ["action"]})).unwrap();
    let handler = app.handlers().common(schema, recorder.function());

    assert_err!(handler.invoke(json!({"other": true}), lambda()).await);
    assert_ok!(handler.invoke(json!({"action": "sync"}), lambda()).await);
    assert_eq!(recorder.calls().len(), 1);
    assert_eq!(handler.source().as_str(), "common");
}

#[tokio::test]
async fn test_custom_correlation_names() {
    let sink = MemorySink::new();
    let config = JeffyConfig::new()
        .correlation_attr_name("trace_id")
        .correlation_id_header("x-trace-id");
    let app = App::with_environment(config, RuntimeEnvironment::default())
        .with_log_sink(Arc::new(sink.clone()));
    let handler = app
        .handlers()
        .rest_api(JsonEncoding, NoneValidator, handler_fn(echo_body));

    let response = handler
        .invoke(json!({"headers": {"x-trace-id": "t-9"}}), lambda())
        .await
        .unwrap();

    assert_eq!(response["headers"]["x-trace-id"], "t-9");
    assert!(response["headers"].get(HEADER).is_none());
    assert_eq!(sink.records()[0].context_str("trace_id"), Some("t-9"));
}
