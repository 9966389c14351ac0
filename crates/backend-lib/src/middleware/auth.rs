// ============================
// crates/backend-lib/src/middleware/auth.rs
// ============================
//! Access gate for protected routes.
//!
//! A request is admitted only when its `Authorization` header carries a
//! bearer token that verifies against the server secret:
//!
//! | header                          | outcome            |
//! |---------------------------------|--------------------|
//! | absent / not `Bearer <token>`   | 401 `access denied` |
//! | `Bearer <token>`, bad token     | 400 `invalid token` |
//! | `Bearer <token>`, good token    | handler runs        |
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use uuid::Uuid;

use crate::{error::AppError, metrics::GATE_REJECTED, AppState};

/// Identity proven by the bearer token, inserted into request extensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub id: Uuid,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware guarding routes that need an authenticated caller
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::debug!(path = %request.uri().path(), "missing bearer token");
        counter!(GATE_REJECTED, "reason" => "missing").increment(1);
        AppError::MissingToken
    })?;

    let account_id = state.tokens.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "rejected bearer token");
        counter!(GATE_REJECTED, "reason" => "invalid").increment(1);
        AppError::InvalidToken(e)
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedAccount { id: account_id });
    Ok(next.run(request).await)
}
