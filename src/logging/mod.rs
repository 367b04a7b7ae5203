//! Structured logging with a mergeable context.
//!
//! Every record is one flat JSON object holding the `level`, the `message`
//! and all context attributes of the emitting [`Logger`]:
//!
//! ```text
//! {"level":"INFO","message":{"foo":1},"aws_region":"us-east-1",...,"correlation_id":"..."}
//! ```
//!
//! Loggers are plain values. The process-wide logger owned by the
//! [`App`](crate::App) carries the static runtime attributes; each invocation
//! derives its own copy with the correlation id merged in, so concurrent
//! invocations never share mutable log context.

mod sink;
mod subscriber;

pub use sink::{LogSink, MemorySink, TracingSink};
pub use subscriber::init_tracing;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// One structured log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: Value,
    pub context: BTreeMap<String, Value>,
}

impl LogRecord {
    /// Flatten the record into a single JSON object.
    ///
    /// Context attributes never overwrite `level` or `message`.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (key, value) in &self.context {
            object.insert(key.clone(), value.clone());
        }
        object.insert("level".to_string(), Value::from(self.level.as_str()));
        object.insert("message".to_string(), self.message.clone());
        Value::Object(object)
    }

    /// Look up a context attribute as a string.
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(Value::as_str)
    }
}

/// Structured logger merging its context into every record.
#[derive(Clone)]
pub struct Logger {
    level: LogLevel,
    context: BTreeMap<String, Value>,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    /// Create a logger writing through `tracing`.
    pub fn new(level: LogLevel) -> Self {
        Self::with_sink(level, Arc::new(TracingSink))
    }

    /// Create a logger writing to a custom sink.
    pub fn with_sink(level: LogLevel, sink: Arc<dyn LogSink>) -> Self {
        Self {
            level,
            context: BTreeMap::new(),
            sink,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn context(&self) -> &BTreeMap<String, Value> {
        &self.context
    }

    /// Merge attributes into this logger's context.
    pub fn update_context<K, V>(&mut self, attrs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in attrs {
            self.context.insert(key.into(), value.into());
        }
    }

    /// Derive a logger whose context is this one's plus `attrs`.
    pub fn with_context<K, V>(&self, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut logger = self.clone();
        logger.update_context(attrs);
        logger
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Emit a record at `level` if it passes the threshold.
    pub fn log(&self, level: LogLevel, message: Value) {
        if !self.enabled(level) {
            return;
        }
        let record = LogRecord {
            level,
            message,
            context: self.context.clone(),
        };
        self.sink.emit(&record);
    }

    pub fn debug<T: Serialize + ?Sized>(&self, message: &T) {
        self.log(LogLevel::Debug, to_message(message));
    }

    pub fn info<T: Serialize + ?Sized>(&self, message: &T) {
        self.log(LogLevel::Info, to_message(message));
    }

    pub fn warn<T: Serialize + ?Sized>(&self, message: &T) {
        self.log(LogLevel::Warn, to_message(message));
    }

    pub fn error<T: Serialize + ?Sized>(&self, message: &T) {
        self.log(LogLevel::Error, to_message(message));
    }

    /// Emit an error record with the error's message and stack trace.
    pub fn exception(&self, err: &dyn std::error::Error) {
        let message = serde_json::json!({
            "error_message": err.to_string(),
            "stack_trace": stack_trace(err),
        });
        self.log(LogLevel::Error, message);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("context", &self.context)
            .finish()
    }
}

fn to_message<T: Serialize + ?Sized>(message: &T) -> Value {
    serde_json::to_value(message).unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)))
}

/// The error followed by its `source()` chain, one cause per line.
///
/// No backtrace is appended: one taken here would point at the logging
/// call, not at the place the error was raised.
fn stack_trace(err: &dyn std::error::Error) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}
