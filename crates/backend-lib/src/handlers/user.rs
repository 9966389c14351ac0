// ============================
// crates/backend-lib/src/handlers/user.rs
// ============================
//! Protected account routes.
use accounts_common::ProfileResponse;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    config::ProfileAccess, error::AppError, middleware::AuthenticatedAccount, AppState,
};

const USER_NOT_FOUND: &str = "user not found";

/// `GET /user/{id}`, behind [`require_bearer`](crate::middleware::require_bearer).
///
/// The account is looked up by the path id. Under `ProfileAccess::OwnerOnly`
/// the path id must also match the token subject.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

    if state.settings.auth.profile_access == ProfileAccess::OwnerOnly && caller.id != id {
        tracing::warn!(caller = %caller.id, requested = %id, "profile read outside own account");
        return Err(AppError::Forbidden);
    }

    let user = state
        .accounts
        .find_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

    Ok(Json(ProfileResponse { user }))
}
