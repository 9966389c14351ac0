// ============================
// crates/backend-lib/src/extract.rs
// ============================
//! Request body extraction.
//!
//! [`JsonBody`] replaces `axum::Json` on the public auth routes so that every
//! body problem is answered with the service's own JSON error:
//!
//! | request                                  | result                     |
//! |------------------------------------------|----------------------------|
//! | no body, or a non-JSON `Content-Type`    | `T::default()`             |
//! | JSON that does not fit `T`               | 422 `invalid request body` |
//! | JSON `Content-Type` with a valid body    | the decoded `T`            |
//!
//! An empty default body then fails field validation with a field-specific
//! message, the same as a body that omits every field.
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body with the service's error contract
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

fn is_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("application/json")
        || mime.to_ascii_lowercase().ends_with("+json")
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = is_json(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "unreadable request body");
            AppError::MalformedBody
        })?;

        if !json || bytes.is_empty() {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "undecodable request body");
            AppError::MalformedBody
        })
    }
}
