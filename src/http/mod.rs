//! HTTP event and response types for API Gateway style triggers.

mod request;
mod response;

pub use request::ApiRequest;
pub use response::{ApiResponse, ErrorBody, StatusCode};

pub(crate) use response::inject_header;
