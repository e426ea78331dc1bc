//! # ablytest-common
//!
//! Shared utilities including sandbox settings, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    ConfigError, NetworkSettings, Protocol, SandboxSettings, DEFAULT_ENVIRONMENT,
    DEFAULT_HOST_BASE, REQUEST_TIMEOUT,
};
pub use error::{AppResult, BoxError, SandboxError};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
