//! Sandbox error types
//!
//! Failures are reported as-is to the caller; nothing here retries.

use crate::config::ConfigError;

/// Boxed error carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while provisioning sandboxes or building client options
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Network, connection or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-2xx response. Only the canonical status text is kept, never the body.
    #[error("{reason}")]
    Status { status: u16, reason: String },

    /// Response body was not a valid fixture document
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Provisioning succeeded but the response lacks an app ID or key secret
    #[error("Provisioned fixture is missing an app ID or key secret")]
    Incomplete,

    /// Credentials were requested from a fixture without keys
    #[error("Fixture has no keys")]
    MissingKey,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SandboxError {
    /// Wrap any transport-level failure
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// Build a status error from a code and its canonical reason phrase
    pub fn status(status: u16, reason: impl Into<String>) -> Self {
        Self::Status {
            status,
            reason: reason.into(),
        }
    }

    /// HTTP status of a protocol error
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get error code for logs and assertions
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Status { .. } => "STATUS_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Encode(_) => "ENCODE_ERROR",
            Self::Incomplete => "INCOMPLETE_FIXTURE",
            Self::MissingKey => "MISSING_KEY",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Check if the remote application does not exist (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for sandbox operations
pub type AppResult<T> = Result<T, SandboxError>;
