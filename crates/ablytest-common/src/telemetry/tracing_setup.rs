//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use tracing::{Level, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter, TestWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter (e.g., "info", "debug", "trace")
    pub level: Level,
    /// Enable JSON output format
    pub json: bool,
    /// Include span events (new, close)
    pub span_events: bool,
    /// Include file and line numbers
    pub file_line: bool,
    /// Include thread names; tests run on named threads
    pub thread_names: bool,
    /// Write through the test harness so output is captured per test
    pub test_writer: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
            thread_names: false,
            test_writer: false,
        }
    }
}

impl TracingConfig {
    /// Configuration for test binaries: debug level, captured output
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: Level::DEBUG,
            json: false,
            span_events: false,
            file_line: false,
            thread_names: true,
            test_writer: true,
        }
    }

    /// Structured output for CI log collection
    #[must_use]
    pub fn json() -> Self {
        Self {
            level: Level::INFO,
            json: true,
            span_events: true,
            file_line: false,
            thread_names: true,
            test_writer: false,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn writer(&self) -> BoxMakeWriter {
        if self.test_writer {
            BoxMakeWriter::new(TestWriter::new())
        } else {
            BoxMakeWriter::new(std::io::stdout)
        }
    }

    fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        let json_layer = self.json.then(|| {
            fmt::layer()
                .json()
                .with_file(self.file_line)
                .with_line_number(self.file_line)
                .with_thread_names(self.thread_names)
                .with_span_events(self.span_events())
                .with_writer(self.writer())
        });
        let pretty_layer = (!self.json).then(|| {
            fmt::layer()
                .with_file(self.file_line)
                .with_line_number(self.file_line)
                .with_thread_names(self.thread_names)
                .with_span_events(self.span_events())
                .with_writer(self.writer())
        });

        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(json_layer)
            .with(pretty_layer)
    }
}

/// Initialize the tracing subscriber with default configuration
///
/// # Panics
/// Panics if a global subscriber is already set.
pub fn init_tracing() {
    init_tracing_with_config(&TracingConfig::default());
}

/// Initialize the tracing subscriber with custom configuration
///
/// # Panics
/// Panics if a global subscriber is already set.
pub fn init_tracing_with_config(config: &TracingConfig) {
    config.subscriber().init();
}

/// Try to initialize tracing; safe to call from every test
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(&TracingConfig::test())
}

/// Try to initialize tracing with custom configuration
pub fn try_init_tracing_with_config(config: &TracingConfig) -> Result<(), TracingError> {
    config
        .subscriber()
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
