// ============================
// crates/backend-lib/src/handlers/home.rs
// ============================
use accounts_common::MessageResponse;
use axum::Json;

/// `GET /`
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("welcome to the API"))
}
