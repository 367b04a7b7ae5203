//! Payload validators.
//!
//! A [`Validator`] accepts or rejects a decoded payload before it reaches the
//! wrapped function. [`NoneValidator`] accepts everything;
//! [`JsonSchemaValidator`] checks values against a JSON Schema document.

mod schema;

pub use self::schema::JsonSchemaValidator;

use thiserror::Error;

/// Acceptance check applied to decoded payloads of type `T`.
pub trait Validator<T: ?Sized>: Send + Sync {
    /// Validate a value, returning a [`ValidationError`] when it is rejected.
    fn validate(&self, value: &T) -> Result<(), ValidationError>;
}

/// Raised when a payload fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Human-readable reason, surfaced to HTTP callers as-is.
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validator that accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneValidator;

impl<T: ?Sized> Validator<T> for NoneValidator {
    fn validate(&self, _value: &T) -> Result<(), ValidationError> {
        Ok(())
    }
}
