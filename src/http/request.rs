//! API Gateway proxy request envelope.

use crate::encoding::DecodeError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Inbound HTTP event as delivered by an API Gateway proxy integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// HTTP method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    /// Request path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// HTTP headers.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headers: HashMap<String, String>,
    /// Query string parameters.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub query_string_parameters: HashMap<String, String>,
    /// Path parameters.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path_parameters: HashMap<String, String>,
    /// Request body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ApiRequest {
    /// Create a new request with the given method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: Some(method.into()),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Raw body bytes, undoing base64 transfer encoding when flagged.
    pub fn body_bytes(&self) -> Option<Result<Vec<u8>, DecodeError>> {
        let body = self.body.as_ref()?;
        if self.is_base64_encoded {
            Some(BASE64.decode(body).map_err(DecodeError::from))
        } else {
            Some(Ok(body.as_bytes().to_vec()))
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}
