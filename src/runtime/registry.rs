//! Registry of handlers hosted by the local runtime.

use super::RuntimeError;
use crate::function::{EventSource, LambdaContext};
use crate::handlers::Handler;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Summary of a registered handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerInfo {
    pub name: String,
    pub source: EventSource,
    /// Completed and in-flight invocations since registration.
    pub invocations: u64,
}

struct HandlerEntry {
    handler: Arc<dyn Handler>,
    invocations: u64,
}

/// Named handlers, invoked with a fresh [`LambdaContext`] per call.
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, HandlerEntry>>,
    env: HashMap<String, String>,
    timeout: Duration,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::with_env(HashMap::new())
    }

    /// Create a registry whose invocations see `env`.
    pub fn with_env(env: HashMap<String, String>) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            env,
            timeout: Duration::from_secs(3),
        }
    }

    /// Set the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register a handler under `name`. Names are unique.
    pub async fn register(
        &self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RuntimeError> {
        self.register_arc(name, Arc::new(handler)).await
    }

    /// Register an already shared handler.
    pub async fn register_arc(
        &self,
        name: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RuntimeError> {
        let name = name.into();
        let mut handlers = self.handlers.write().await;
        if handlers.contains_key(&name) {
            return Err(RuntimeError::AlreadyRegistered(name));
        }

        info!("Registered {} handler: {}", handler.source(), name);
        handlers.insert(
            name,
            HandlerEntry {
                handler,
                invocations: 0,
            },
        );
        Ok(())
    }

    /// Invoke the handler registered under `name` with one event.
    pub async fn invoke(
        &self,
        name: &str,
        event: Value,
        request_id: &str,
    ) -> Result<Value, RuntimeError> {
        let handler = {
            let mut handlers = self.handlers.write().await;
            let entry = handlers
                .get_mut(name)
                .ok_or_else(|| RuntimeError::NotFound(name.to_string()))?;
            entry.invocations += 1;
            entry.handler.clone()
        };

        let context = self.context(name, request_id);
        debug!("Invoking handler '{}' [{}]", name, request_id);

        match tokio::time::timeout(self.timeout, handler.invoke(event, context)).await {
            Ok(result) => result.map_err(RuntimeError::from),
            Err(_) => {
                warn!("Handler '{}' timed out [{}]", name, request_id);
                Err(RuntimeError::Timeout(self.timeout))
            }
        }
    }

    /// List registered handlers, sorted by name.
    pub async fn list(&self) -> Vec<HandlerInfo> {
        let handlers = self.handlers.read().await;
        let mut infos: Vec<HandlerInfo> = handlers
            .iter()
            .map(|(name, entry)| HandlerInfo {
                name: name.clone(),
                source: entry.handler.source(),
                invocations: entry.invocations,
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Remove a handler from the registry.
    pub async fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        let mut handlers = self.handlers.write().await;
        handlers
            .remove(name)
            .ok_or_else(|| RuntimeError::NotFound(name.to_string()))?;

        info!("Removed handler: {}", name);
        Ok(())
    }

    fn context(&self, name: &str, request_id: &str) -> LambdaContext {
        let mut context = LambdaContext::new(name, request_id);
        context.env = self.env.clone();
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        context.with_deadline_ms(now_ms + self.timeout.as_millis() as u64)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
