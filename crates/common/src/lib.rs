// ================
// common/src/lib.rs
// ================
//! Request and response bodies exchanged between account-service clients
//! and the server. All bodies are UTF-8 JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account identifier type
pub type AccountId = Uuid;

/// Body of `POST /auth/register`
///
/// Missing fields deserialize as empty strings so that the server can answer
/// with a field-specific validation message instead of a decode failure.
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmpassword", alias = "confirm_password")]
    pub confirm_password: String,
}

/// Body of `POST /auth/login`
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Generic `{ "msg": ... }` body used by most responses
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub msg: String,
    /// Bearer token to present as `Authorization: Bearer <token>`
    pub token: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `GET /user/{id}`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileResponse {
    pub user: AccountProfile,
}
