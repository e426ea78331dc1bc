//! Configuration structs

mod sandbox_settings;

pub use sandbox_settings::{
    ConfigError, NetworkSettings, Protocol, SandboxSettings, DEFAULT_ENVIRONMENT,
    DEFAULT_HOST_BASE, REQUEST_TIMEOUT,
};
