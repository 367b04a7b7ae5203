//! Business functions and the context they run with.

pub mod context;
pub mod handler;
pub mod message;

pub use context::{EventSource, InvocationContext, LambdaContext};
pub use handler::{handler_fn, EventFunction, HandlerFn};
pub use message::Message;
