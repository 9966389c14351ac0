// ============================
// crates/backend-lib/src/routes.rs
// ============================
//! Router construction.
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware::require_bearer, AppState};

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/user/{id}", get(handlers::user::get_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/", get(handlers::home::welcome))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
