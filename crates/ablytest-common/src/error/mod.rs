//! Error types

mod sandbox_error;

pub use sandbox_error::{AppResult, BoxError, SandboxError};
