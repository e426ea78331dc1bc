//! Sandbox settings
//!
//! Environment variables are read once into a [`SandboxSettings`] value which is
//! then passed explicitly to whatever needs it, so provisioning never consults
//! process-wide state on its own.

use std::convert::Infallible;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment used when `ABLY_ENV` is unset or empty
pub const DEFAULT_ENVIRONMENT: &str = "sandbox";

/// Host the environment prefix is attached to
pub const DEFAULT_HOST_BASE: &str = "ably.io";

/// Single timeout used for connect, TLS handshake, keep-alive and whole requests
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire protocol preference handed to the client.
///
/// Names other than the two known protocols are kept verbatim in
/// [`Protocol::Other`] and passed through to the client unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Json,
    MsgPack,
    Other(String),
}

impl Protocol {
    /// MIME type sent on the wire. Unknown protocols are sent as given.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Json => "application/json",
            Self::MsgPack => "application/x-msgpack",
            Self::Other(name) => name,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::MsgPack)
    }
}

impl From<&str> for Protocol {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" | "application/json" => Self::Json,
            "msgpack" | "application/x-msgpack" => Self::MsgPack,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl FromStr for Protocol {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::MsgPack => write!(f, "msgpack"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Network settings for the HTTP client factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Value of `HTTP_PROXY`. Its presence also turns TLS verification off.
    pub proxy: Option<String>,
    pub timeout: Duration,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Everything needed to provision sandboxes and build client options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxSettings {
    /// Target environment, the `{env}` in `{env}-rest.{host}`
    pub environment: String,
    pub protocol: Option<Protocol>,
    pub host_base: String,
    /// Full REST base URL replacing `https://{env}-rest.{host}`
    pub endpoint: Option<String>,
    pub network: NetworkSettings,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            protocol: None,
            host_base: DEFAULT_HOST_BASE.to_string(),
            endpoint: None,
            network: NetworkSettings::default(),
        }
    }
}

impl SandboxSettings {
    /// Load settings from environment variables
    ///
    /// | variable | default |
    /// |---|---|
    /// | `ABLY_ENV` | `sandbox` |
    /// | `ABLY_PROTOCOL` | unset |
    /// | `ABLY_HOST` | `ably.io` |
    /// | `ABLY_SANDBOX_ENDPOINT` | unset |
    /// | `HTTP_PROXY` | unset |
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            environment: var("ABLY_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            protocol: var("ABLY_PROTOCOL").map(|s| Protocol::from(s.as_str())),
            host_base: var("ABLY_HOST").unwrap_or_else(|| DEFAULT_HOST_BASE.to_string()),
            endpoint: var("ABLY_SANDBOX_ENDPOINT")
                .map(|s| s.trim_end_matches('/').to_string()),
            network: NetworkSettings {
                proxy: var("HTTP_PROXY"),
                timeout: REQUEST_TIMEOUT,
            },
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.network.proxy = Some(proxy.into());
        self
    }

    /// Base URL of the sandbox REST API, without a trailing slash
    #[must_use]
    pub fn rest_base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}-rest.{}", self.environment, self.host_base),
        }
    }
}

/// Configuration errors. Settings load without validation; a bad value
/// surfaces when a client or URL is built from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Named variable holds a value that cannot be used
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
