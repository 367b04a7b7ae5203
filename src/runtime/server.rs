//! HTTP front end of the local runtime.

use super::{HandlerRegistry, RuntimeConfig, RuntimeError};
use crate::handlers::Handler;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

const INVOKE_PREFIX: &str = "/2015-03-31/functions/";
const INVOKE_SUFFIX: &str = "/invocations";

/// Local stand-in for the Lambda invoke API.
///
/// Routes:
/// - `POST /2015-03-31/functions/{name}/invocations` invokes a handler with
///   the JSON request body as the event.
/// - `GET /_health` returns `OK`.
/// - `GET /_functions` lists the registered handlers.
///
/// A failing handler yields a 200 response carrying
/// `{"errorMessage", "errorType"}` and `X-Amz-Function-Error: Unhandled`.
pub struct LocalRuntime {
    config: RuntimeConfig,
    registry: Arc<HandlerRegistry>,
}

impl LocalRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let registry = HandlerRegistry::with_env(config.env.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs));
        Self {
            config,
            registry: Arc::new(registry),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RuntimeConfig::default())
    }

    pub fn registry(&self) -> Arc<HandlerRegistry> {
        self.registry.clone()
    }

    /// Register a handler under a function name.
    pub async fn register(
        &self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RuntimeError> {
        self.registry.register(name, handler).await
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn run(self) -> Result<(), RuntimeError> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections accepted on `listener`.
    pub async fn serve(self, listener: TcpListener) -> Result<(), RuntimeError> {
        info!("Local runtime listening on {}", listener.local_addr()?);

        let registry = self.registry;
        let max_body_size = self.config.max_body_size;

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let registry = registry.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let registry = registry.clone();
                    async move { handle_request(req, registry, max_body_size, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

async fn handle_request(
    req: Request<Incoming>,
    registry: Arc<HandlerRegistry>,
    max_body_size: usize,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    debug!("Handling request: {} {} from {}", method, path, remote_addr);

    if method == Method::GET && path == "/_health" {
        return Ok(text_response(StatusCode::OK, "OK"));
    }

    if method == Method::GET && path == "/_functions" {
        let functions = registry.list().await;
        return Ok(json_response(StatusCode::OK, &json!({ "functions": functions })));
    }

    let Some(name) = function_name(&path) else {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            "UnknownOperationException",
            format!("no route for {} {}", method, path),
        ));
    };
    if method != Method::POST {
        return Ok(error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "UnknownOperationException",
            format!("{} is not supported for invocations", method),
        ));
    }
    let name = name.to_string();

    let body = match Limited::new(req.into_body(), max_body_size).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            warn!("Rejected payload for '{}': {}", name, err);
            return Ok(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "RequestTooLargeException",
                err.to_string(),
            ));
        }
    };

    let event = if body.is_empty() {
        json!({})
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(event) => event,
            Err(err) => {
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    "InvalidRequestContentException",
                    err.to_string(),
                ))
            }
        }
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    let mut response = match registry.invoke(&name, event, &request_id).await {
        Ok(result) => json_response(StatusCode::OK, &result),
        Err(RuntimeError::NotFound(_)) => error_response(
            StatusCode::NOT_FOUND,
            "ResourceNotFoundException",
            format!("function not found: {}", name),
        ),
        Err(err) => {
            error!("Handler '{}' error: {} [{}]", name, err, request_id);
            let mut response = json_response(
                StatusCode::OK,
                &json!({ "errorMessage": err.to_string(), "errorType": err.error_type() }),
            );
            response.headers_mut().insert(
                HeaderName::from_static("x-amz-function-error"),
                HeaderValue::from_static("Unhandled"),
            );
            response
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-amzn-requestid"), value);
    }
    Ok(response)
}

/// Extract `{name}` from `/2015-03-31/functions/{name}/invocations`.
fn function_name(path: &str) -> Option<&str> {
    path.strip_prefix(INVOKE_PREFIX)?
        .strip_suffix(INVOKE_SUFFIX)
        .filter(|name| !name.is_empty() && !name.contains('/'))
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

fn json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(status: StatusCode, error_type: &str, message: String) -> Response<Full<Bytes>> {
    json_response(
        status,
        &json!({ "errorMessage": message, "errorType": error_type }),
    )
}
