//! Framework configuration and the hosting runtime's ambient environment.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default payload/log attribute carrying the correlation id.
pub const DEFAULT_CORRELATION_ATTR_NAME: &str = "correlation_id";

/// Default HTTP header carrying the correlation id.
pub const DEFAULT_CORRELATION_ID_HEADER: &str = "x-jeffy-correlation-id";

/// Configuration shared by every handler of an [`App`](crate::App).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JeffyConfig {
    /// Key used for the correlation id in payloads and log records.
    pub correlation_attr_name: String,
    /// HTTP header used for the correlation id.
    pub correlation_id_header: String,
    /// Minimum level of emitted log records.
    pub log_level: LogLevel,
}

impl Default for JeffyConfig {
    fn default() -> Self {
        Self {
            correlation_attr_name: DEFAULT_CORRELATION_ATTR_NAME.to_string(),
            correlation_id_header: DEFAULT_CORRELATION_ID_HEADER.to_string(),
            log_level: LogLevel::Info,
        }
    }
}

impl JeffyConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from `JEFFY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(name) = lookup("JEFFY_CORRELATION_ATTR_NAME").filter(|v| !v.is_empty()) {
            config.correlation_attr_name = name;
        }
        if let Some(header) = lookup("JEFFY_CORRELATION_ID_HEADER").filter(|v| !v.is_empty()) {
            config.correlation_id_header = header;
        }
        if let Some(level) = lookup("JEFFY_LOG_LEVEL") {
            config.log_level = level.parse().unwrap_or_default();
        }
        config
    }

    /// Set the correlation attribute name.
    pub fn correlation_attr_name(mut self, name: impl Into<String>) -> Self {
        self.correlation_attr_name = name.into();
        self
    }

    /// Set the correlation id header name.
    pub fn correlation_id_header(mut self, header: impl Into<String>) -> Self {
        self.correlation_id_header = header.into();
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

/// Static attributes of the function instance, read once at process start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEnvironment {
    pub aws_region: Option<String>,
    pub function_name: Option<String>,
    pub function_version: Option<String>,
    pub function_memory_size: Option<String>,
    pub log_group_name: Option<String>,
    pub log_stream_name: Option<String>,
}

impl RuntimeEnvironment {
    /// Read the environment of the current process.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the environment from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            aws_region: lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")),
            function_name: lookup("AWS_LAMBDA_FUNCTION_NAME"),
            function_version: lookup("AWS_LAMBDA_FUNCTION_VERSION"),
            function_memory_size: lookup("AWS_LAMBDA_FUNCTION_MEMORY_SIZE"),
            log_group_name: lookup("AWS_LAMBDA_LOG_GROUP_NAME"),
            log_stream_name: lookup("AWS_LAMBDA_LOG_STREAM_NAME"),
        }
    }

    /// Log context attributes; missing values are kept as `null`.
    pub fn log_context(&self) -> BTreeMap<String, Value> {
        let entries = [
            ("aws_region", &self.aws_region),
            ("function_name", &self.function_name),
            ("function_version", &self.function_version),
            ("function_memory_size", &self.function_memory_size),
            ("log_group_name", &self.log_group_name),
            ("log_stream_name", &self.log_stream_name),
        ];
        entries
            .into_iter()
            .map(|(key, value)| {
                let value = value.clone().map(Value::String).unwrap_or(Value::Null);
                (key.to_string(), value)
            })
            .collect()
    }
}
