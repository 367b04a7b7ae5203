//! Business function trait and the closure adapter.

use crate::error::HandlerError;
use crate::function::{InvocationContext, Message};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;

/// Business logic wrapped by a handler.
///
/// Implement it directly for stateful functions, or wrap an async closure
/// with [`handler_fn`].
#[async_trait]
pub trait EventFunction<T: Send + 'static>: Send + Sync {
    /// Handle one message. Called exactly once per message, never retried.
    async fn call(&self, message: Message<T>, ctx: InvocationContext) -> Result<Value, HandlerError>;
}

/// An [`EventFunction`] backed by an async closure.
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Turn `|message, ctx| async move { ... }` (or an `async fn` taking the
/// same arguments) into an [`EventFunction`].
pub fn handler_fn<T, F, Fut>(f: F) -> HandlerFn<F>
where
    T: Send + 'static,
    F: Fn(Message<T>, InvocationContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    HandlerFn { f }
}

#[async_trait]
impl<T, F, Fut> EventFunction<T> for HandlerFn<F>
where
    T: Send + 'static,
    F: Fn(Message<T>, InvocationContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    async fn call(&self, message: Message<T>, ctx: InvocationContext) -> Result<Value, HandlerError> {
        (self.f)(message, ctx).await
    }
}
