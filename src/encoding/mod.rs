//! Payload encodings converting between raw bytes and in-memory values.
//!
//! An [`Encoding`] is chosen when a handler is wrapped and shared by every
//! invocation of that handler. Two encodings ship with the crate:
//!
//! - [`BytesEncoding`] passes opaque bytes through untouched.
//! - [`JsonEncoding`] parses UTF-8 JSON text into a [`serde_json::Value`].

mod raw;
mod json;

pub use self::raw::BytesEncoding;
pub use self::json::JsonEncoding;

use thiserror::Error;

/// Bidirectional conversion between bytes and a structured payload.
pub trait Encoding: Send + Sync {
    /// The decoded in-memory representation.
    type Item: Send + Sync + 'static;

    /// Serialize an item to bytes.
    fn encode(&self, item: &Self::Item) -> Result<bytes::Bytes, EncodeError>;

    /// Parse bytes into an item.
    fn decode(&self, payload: &[u8]) -> Result<Self::Item, DecodeError>;
}

/// Raised when a payload cannot be converted to its structured form.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Raised when a value cannot be represented in the target encoding.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("value cannot be encoded as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
