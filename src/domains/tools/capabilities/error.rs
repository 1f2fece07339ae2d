//! Capability error types.
//!
//! These carry the real cause of a failure. They are logged server-side and
//! never serialized into a response body.

use thiserror::Error;

/// Speech synthesis failures.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The backend rejected the language code.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The backend could not be reached or answered with an error.
    #[error("Synthesis backend failed: {0}")]
    Backend(String),

    /// The audio could not be written to disk.
    #[error("Failed to write audio: {0}")]
    Io(#[from] std::io::Error),
}

/// Domain lookup failures.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The lookup did not finish within its timeout.
    #[error("Lookup timed out after {0} ms")]
    Timeout(u128),

    /// The registry reported no data for the domain.
    #[error("No registry data for '{0}'")]
    NotRegistered(String),

    /// The server answered with something that is not WHOIS text.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connecting to or talking to a server failed.
    #[error("Network error talking to {server}: {source}")]
    Network {
        server: String,
        #[source]
        source: std::io::Error,
    },
}

/// File write failures.
#[derive(Debug, Error)]
#[error("Failed to write {path}: {source}")]
pub struct WriteError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

impl SynthesisError {
    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl LookupError {
    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a network error for `server`.
    pub fn network(server: impl Into<String>, source: std::io::Error) -> Self {
        Self::Network {
            server: server.into(),
            source,
        }
    }
}
