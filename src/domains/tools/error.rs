//! Tool-specific error types.
//!
//! Every failure a tool endpoint can produce is a `ToolError`. The variant
//! decides the HTTP status, and `public_message` decides what the caller is
//! told. Capability causes stay in the `Display` output, which is only logged.

use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

use super::capabilities::{LookupError, SynthesisError, WriteError};
use crate::core::security::PathSecurityError;

/// Errors that can occur during tool dispatch.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required field is missing, empty or malformed.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// A client-supplied file name failed the path sanitizer.
    #[error("Unsafe file name: {0}")]
    PathSafety(#[from] PathSecurityError),

    /// The external capability failed.
    #[error("{tool} capability failed: {source}")]
    Capability {
        tool: &'static str,
        #[source]
        source: CapabilityFailure,
    },

    /// The requested resource or route does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The target artifact exists and overwriting is disabled.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// The underlying cause of a capability failure.
#[derive(Debug, Error)]
pub enum CapabilityFailure {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// The gateway gave up waiting for the adapter.
    #[error("no result within {0:?}")]
    TimedOut(Duration),
}

impl ToolError {
    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new capability error for `tool`.
    pub fn capability(tool: &'static str, source: impl Into<CapabilityFailure>) -> Self {
        Self::Capability {
            tool,
            source: source.into(),
        }
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            // A missing artifact root is a server fault, not a bad name
            Self::PathSafety(PathSecurityError::RootUnavailable { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::PathSafety(_) => StatusCode::BAD_REQUEST,
            Self::Capability { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Message safe to send to an untrusted caller.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg.clone(),
            Self::PathSafety(PathSecurityError::EmptyName) => "Filename is required.".to_string(),
            Self::PathSafety(
                PathSecurityError::DirectoryComponents { .. }
                | PathSecurityError::ReservedName { .. },
            ) => "Filename must be a plain name without directories.".to_string(),
            Self::PathSafety(PathSecurityError::RootUnavailable { .. }) => {
                "Artifact storage is unavailable.".to_string()
            }
            Self::PathSafety(_) => "Filename is not allowed.".to_string(),
            Self::Capability { tool, source } => match source {
                CapabilityFailure::TimedOut(_)
                | CapabilityFailure::Lookup(LookupError::Timeout(_)) => {
                    format!("The {} service did not respond in time.", tool)
                }
                CapabilityFailure::Synthesis(SynthesisError::UnsupportedLanguage(_)) => {
                    "Failed to create the TTS file: language not supported.".to_string()
                }
                CapabilityFailure::Synthesis(_) => "Failed to create the TTS file.".to_string(),
                CapabilityFailure::Lookup(_) => "Failed to perform the WHOIS lookup.".to_string(),
                CapabilityFailure::Write(_) => "Failed to create the file on the server.".to_string(),
            },
        }
    }
}
