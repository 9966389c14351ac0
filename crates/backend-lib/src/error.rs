// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::{HashError, TokenError};
use crate::storage::StoreError;
use crate::validation::ValidationError;

/// Message sent to clients for every 5xx error
pub const SERVER_ERROR_MESSAGE: &str = "server error, please try again later";

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid request body")]
    MalformedBody,

    #[error("access denied")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken(#[source] TokenError),

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Store(#[source] StoreError),

    #[error("password hashing failed: {0}")]
    Hash(#[from] HashError),

    #[error("token issuance failed: {0}")]
    TokenIssue(#[source] TokenError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::MalformedBody => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_)
            | AppError::Hash(_)
            | AppError::TokenIssue(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Conflict(_) => "VAL_002",
            AppError::MalformedBody => "VAL_003",
            AppError::MissingToken => "AUTH_001",
            AppError::InvalidToken(_) => "AUTH_002",
            AppError::Forbidden => "AUTH_003",
            AppError::NotFound(_) => "NF_001",
            AppError::Store(_) => "STORE_001",
            AppError::Hash(_) => "INT_002",
            AppError::TokenIssue(_) => "INT_003",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Message safe to show a client. Server-side detail never leaves the process.
    pub fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            SERVER_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => AppError::Conflict(format!("{field} already used")),
            other => AppError::Store(other),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }

        let body = json!({
            "msg": self.client_message(),
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
