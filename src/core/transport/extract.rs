//! Request body extraction for the tool endpoints.

use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use http::{StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domains::tools::ResponseEnvelope;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A tool request body, accepted as JSON or as an urlencoded form.
///
/// An empty body yields `T::default()` so that missing fields are reported
/// by validation. Anything unparseable is rejected with a 400 envelope.
#[derive(Debug, Clone, Default)]
pub struct ToolBody<T>(pub T);

impl<S, T> FromRequest<S> for ToolBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ResponseEnvelope;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE));

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!("Failed to read request body: {}", e);
            invalid_body()
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let parsed = if is_form {
            serde_urlencoded::from_bytes(&bytes).map_err(|e| e.to_string())
        } else {
            serde_json::from_slice(&bytes).map_err(|e| e.to_string())
        };

        parsed.map(Self).map_err(|e| {
            debug!("Rejected request body: {}", e);
            invalid_body()
        })
    }
}

fn invalid_body() -> ResponseEnvelope {
    ResponseEnvelope::error(StatusCode::BAD_REQUEST, "Invalid request body.")
}
