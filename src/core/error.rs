//! Error types and handling for the gateway.
//!
//! Request-level failures never reach this type: the tool gateway turns them
//! into response envelopes. `Error` covers startup and serving failures that
//! end the process.

use thiserror::Error;

use super::transport::TransportError;

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the gateway.
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised while binding or serving HTTP.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors, such as failing to create the artifact directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
