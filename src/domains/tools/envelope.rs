//! The uniform response envelope.
//!
//! Every API response body except the status snapshot is a
//! `ResponseEnvelope`: a `status` of `"success"` or `"error"`, a
//! human-readable `message`, an HTTP `code` on errors, and any number of
//! endpoint-specific fields flattened next to them.

use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::ToolError;

/// Outcome reported in the envelope's `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// A complete response, built once per request.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    status: EnvelopeStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,

    message: String,

    #[serde(flatten)]
    data: Map<String, Value>,

    #[serde(skip)]
    http_code: StatusCode,
}

impl ResponseEnvelope {
    /// A `200 OK` success envelope.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            code: None,
            message: message.into(),
            data: Map::new(),
            http_code: StatusCode::OK,
        }
    }

    /// An error envelope reported with `http_code`.
    pub fn error(http_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            code: Some(http_code.as_u16()),
            message: message.into(),
            data: Map::new(),
            http_code,
        }
    }

    /// The 404 envelope for a path no route matched.
    pub fn route_not_found(path: &str) -> Self {
        Self::from(ToolError::not_found("Endpoint not found.")).with("path", path)
    }

    /// Attach an endpoint-specific field.
    ///
    /// The reserved keys `status`, `code` and `message` are ignored so the
    /// envelope shape cannot be overridden.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if !matches!(key, "status" | "code" | "message") {
            self.data.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn status(&self) -> EnvelopeStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_code(&self) -> StatusCode {
        self.http_code
    }

    /// Look up an endpoint-specific field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }
}

impl From<&ToolError> for ResponseEnvelope {
    fn from(err: &ToolError) -> Self {
        Self::error(err.status_code(), err.public_message())
    }
}

impl From<ToolError> for ResponseEnvelope {
    fn from(err: ToolError) -> Self {
        Self::from(&err)
    }
}
