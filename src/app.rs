//! Application wiring: configuration, environment and the root logger.

use crate::config::{JeffyConfig, RuntimeEnvironment};
use crate::handlers::Handlers;
use crate::logging::{LogSink, Logger};
use std::sync::{Arc, OnceLock};

static APP: OnceLock<App> = OnceLock::new();

/// Entry point for building handlers.
///
/// The root logger carries the runtime environment (region, function name,
/// version, memory size, log group and stream) in its context, so every
/// record emitted by a handler built from this app includes it.
#[derive(Debug, Clone)]
pub struct App {
    config: Arc<JeffyConfig>,
    environment: RuntimeEnvironment,
    logger: Logger,
}

impl App {
    /// Create an app reading the runtime environment from the process.
    pub fn new(config: JeffyConfig) -> Self {
        Self::with_environment(config, RuntimeEnvironment::from_env())
    }

    /// Create an app with an explicit runtime environment.
    pub fn with_environment(config: JeffyConfig, environment: RuntimeEnvironment) -> Self {
        let logger = Logger::new(config.log_level).with_context(environment.log_context());
        Self {
            config: Arc::new(config),
            environment,
            logger,
        }
    }

    /// Create an app configured from `JEFFY_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(JeffyConfig::from_env())
    }

    /// Replace the log sink, keeping the level and the environment context.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.logger = Logger::with_sink(self.config.log_level, sink)
            .with_context(self.environment.log_context());
        self
    }

    pub fn config(&self) -> &JeffyConfig {
        &self.config
    }

    pub fn environment(&self) -> &RuntimeEnvironment {
        &self.environment
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Builder for handler wrappers sharing this app's config and logger.
    pub fn handlers(&self) -> Handlers {
        Handlers::new(&self.config, self.logger.clone())
    }
}

/// Install the process-wide app. Only the first call configures it; later
/// calls return the app installed first.
pub fn setup(config: JeffyConfig) -> &'static App {
    APP.get_or_init(|| App::new(config))
}

/// The process-wide app, configured from the environment if [`setup`] was
/// never called.
pub fn get_app() -> &'static App {
    APP.get_or_init(App::from_env)
}
