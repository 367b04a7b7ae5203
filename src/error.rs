//! Error types for the handler pipeline.

use crate::encoding::{DecodeError, EncodeError};
use crate::sdk::SdkError;
use crate::validator::ValidationError;
use thiserror::Error;

/// Error raised by user business functions.
///
/// Any error type can be returned from a wrapped function; it travels
/// through the pipeline untouched.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error returned by a wrapped handler to the invoking runtime.
#[derive(Error, Debug)]
pub enum JeffyError {
    /// The payload could not be decoded by the configured encoding.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The payload could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The decoded payload was rejected by the configured validator.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The event envelope did not have the shape expected for its source.
    #[error("malformed event envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// An externally stored payload could not be fetched.
    #[error("failed to fetch payload: {0}")]
    Fetch(#[source] SdkError),

    /// The wrapped business function failed.
    #[error(transparent)]
    Handler(HandlerError),
}

impl JeffyError {
    /// Whether the error came from the wrapped function rather than the pipeline.
    pub fn is_handler_error(&self) -> bool {
        matches!(self, JeffyError::Handler(_))
    }

    /// Recover the business error raised by the wrapped function.
    pub fn into_handler_error(self) -> Option<HandlerError> {
        match self {
            JeffyError::Handler(err) => Some(err),
            _ => None,
        }
    }

    /// Short name of the error class, used in runtime error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            JeffyError::Decode(_) => "DecodeError",
            JeffyError::Encode(_) => "EncodeError",
            JeffyError::Validation(_) => "ValidationError",
            JeffyError::Envelope(_) => "EnvelopeError",
            JeffyError::Fetch(_) => "FetchError",
            JeffyError::Handler(_) => "HandlerError",
        }
    }
}
