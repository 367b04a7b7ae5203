//! Local invocation runtime.
//!
//! Hosts registered [`Handler`](crate::handlers::Handler)s behind an HTTP
//! endpoint shaped like the Lambda invoke API, so wrapped handlers can be
//! exercised end to end without a cloud deployment.

mod config;
mod registry;
mod server;

pub use config::RuntimeConfig;
pub use registry::{HandlerInfo, HandlerRegistry};
pub use server::LocalRuntime;

use crate::error::JeffyError;
use thiserror::Error;

/// Errors raised by the local runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("handler '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("handler '{0}' not found")]
    NotFound(String),

    #[error("task timed out after {:.2} seconds", .0.as_secs_f64())]
    Timeout(std::time::Duration),

    /// The handler itself failed.
    #[error(transparent)]
    Invoke(#[from] JeffyError),

    #[error("invalid bind address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Error type reported in invocation error payloads.
    pub fn error_type(&self) -> &'static str {
        match self {
            RuntimeError::NotFound(_) => "ResourceNotFoundException",
            RuntimeError::Timeout(_) => "TimeoutError",
            RuntimeError::Invoke(err) => err.kind(),
            _ => "ServiceException",
        }
    }
}
