//! Domain errors - error types for the fixture model

use thiserror::Error;

/// Errors raised while parsing a capability grant string
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Capability string is empty")]
    Empty,

    #[error("Malformed capability: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Capability resource {0:?} has no operations")]
    NoOperations(String),
}

impl CapabilityError {
    /// Get an error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "CAPABILITY_EMPTY",
            Self::Malformed(_) => "CAPABILITY_MALFORMED",
            Self::NoOperations(_) => "CAPABILITY_NO_OPERATIONS",
        }
    }
}
