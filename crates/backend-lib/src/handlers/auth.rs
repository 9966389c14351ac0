// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Registration and login.
//!
//! Password hashing and verification are CPU-bound, so both run on the
//! blocking pool instead of the request's async worker.
use accounts_common::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use axum::{extract::State, http::StatusCode, Json};
use metrics::counter;
use zeroize::{Zeroize, Zeroizing};

use crate::{
    error::AppError,
    extract::JsonBody,
    metrics::{ACCOUNT_REGISTERED, LOGIN_FAILED, LOGIN_SUCCEEDED},
    storage::NewAccount,
    validation::{validate_login, validate_registration, ValidationError},
    AppState,
};

/// `POST /auth/register`
///
/// No token is issued here; the caller logs in separately.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(mut req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let checked = validate_registration(&req);
    req.confirm_password.zeroize();
    let mut password = Zeroizing::new(std::mem::take(&mut req.password));
    checked.map_err(|e| {
        tracing::debug!(field = e.field(), "registration rejected");
        e
    })?;

    let RegisterRequest { name, email, .. } = req;

    if state.accounts.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("email already used".to_string()));
    }
    if state.accounts.find_by_name(&name).await?.is_some() {
        return Err(AppError::Conflict("name already used".to_string()));
    }

    let hasher = state.hasher;
    let password_hash =
        tokio::task::spawn_blocking(move || hasher.hash_secure(&mut password)).await??;

    // the store re-checks uniqueness atomically; a lost race surfaces as a conflict
    let account = state
        .accounts
        .create(NewAccount {
            name,
            email,
            password_hash,
        })
        .await?;

    counter!(ACCOUNT_REGISTERED).increment(1);
    tracing::info!(account_id = %account.id, name = %account.name, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("user created successfully")),
    ))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(mut req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let password = Zeroizing::new(std::mem::take(&mut req.password));
    let name = req.name;
    validate_login(&name, &password)?;

    let Some(account) = state.accounts.find_by_name(&name).await? else {
        counter!(LOGIN_FAILED, "reason" => "unknown_name").increment(1);
        tracing::warn!(%name, "login for unknown account");
        return Err(AppError::NotFound("user not found".to_string()));
    };

    let hasher = state.hasher;
    let stored_hash = account.password_hash.clone();
    let matches =
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash)).await?;

    if !matches {
        counter!(LOGIN_FAILED, "reason" => "bad_password").increment(1);
        tracing::warn!(account_id = %account.id, "login with wrong password");
        return Err(ValidationError::InvalidPassword.into());
    }

    let token = state.tokens.issue(account.id).map_err(AppError::TokenIssue)?;

    counter!(LOGIN_SUCCEEDED).increment(1);
    tracing::info!(account_id = %account.id, "login succeeded");

    Ok(Json(LoginResponse {
        msg: "authentication successful".to_string(),
        token,
    }))
}
