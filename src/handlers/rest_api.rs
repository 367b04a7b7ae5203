use super::{Handler, Pipeline};
use crate::correlation::{CorrelationContext, Headers};
use crate::encoding::Encoding;
use crate::error::JeffyError;
use crate::function::{EventFunction, EventSource, LambdaContext, Message};
use crate::http::{inject_header, ApiRequest, ApiResponse, StatusCode};
use crate::validator::Validator;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Body of 500 responses; internal error details stay in the logs.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// API Gateway request handler.
///
/// The function receives the decoded body (`None` when the request had no
/// body) with the request headers as metadata. Decode and validation
/// failures produce a 400 response carrying the failure message; errors
/// raised by the function produce a generic 500 response. The correlation id
/// is added to the headers of every response that has a `headers` map.
pub struct RestApiHandler<E, V, F> {
    pipeline: Pipeline,
    encoding: E,
    validator: V,
    function: F,
    response_headers: HashMap<String, String>,
}

impl<E, V, F> RestApiHandler<E, V, F> {
    pub(crate) fn new(pipeline: Pipeline, encoding: E, validator: V, function: F) -> Self {
        Self {
            pipeline,
            encoding,
            validator,
            function,
            response_headers: HashMap::new(),
        }
    }

    /// Headers added to the 400 and 500 responses built by the handler.
    pub fn with_response_headers<I, K, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<String>,
    {
        for (key, value) in headers {
            self.response_headers.insert(key.into(), value.into());
        }
        self
    }

    fn error_response(&self, status: StatusCode, message: String, correlation: &CorrelationContext) -> Value {
        ApiResponse::error(status, message)
            .headers(self.response_headers.clone())
            .header(&correlation.header_name, &correlation.current_id)
            .into_value()
    }
}

#[async_trait]
impl<E, V, F> Handler for RestApiHandler<E, V, F>
where
    E: Encoding,
    V: Validator<E::Item>,
    F: EventFunction<Option<E::Item>>,
{
    async fn invoke(&self, event: Value, context: LambdaContext) -> Result<Value, JeffyError> {
        let source = EventSource::RestApi;
        let request = match ApiRequest::deserialize(&event) {
            Ok(request) => request,
            Err(err) => {
                return Err(self
                    .pipeline
                    .reject_unresolved(source, &context, &event, JeffyError::Envelope(err)))
            }
        };

        let ctx = self
            .pipeline
            .start(source, &Headers(&request.headers), &context, &event);

        let body = match request.body_bytes() {
            None => None,
            Some(bytes) => {
                let decoded = bytes
                    .map_err(JeffyError::from)
                    .and_then(|bytes| self.encoding.decode(&bytes).map_err(JeffyError::from))
                    .and_then(|item| {
                        self.validator.validate(&item)?;
                        Ok(item)
                    });
                match decoded {
                    Ok(item) => Some(item),
                    Err(err) => {
                        let err = self.pipeline.reject(&ctx, err);
                        return Ok(self.error_response(
                            StatusCode::BAD_REQUEST,
                            err.to_string(),
                            ctx.correlation(),
                        ));
                    }
                }
            }
        };

        let correlation = ctx.correlation().clone();
        let message = Message::new(body, ctx.correlation_id())
            .with_metadata(request.headers)
            .with_record(event);

        match self.pipeline.invoke(&self.function, message, ctx).await {
            Ok(mut result) => {
                inject_header(&mut result, &correlation.header_name, &correlation.current_id);
                Ok(result)
            }
            Err(_) => Ok(self.error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
                &correlation,
            )),
        }
    }

    fn source(&self) -> EventSource {
        EventSource::RestApi
    }
}
