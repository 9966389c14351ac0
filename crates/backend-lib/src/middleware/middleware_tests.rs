use super::*;
use crate::config::Settings;
use crate::storage::MemoryAccountStore;
use crate::AppState;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn test_state() -> AppState {
    let mut settings = Settings::default();
    settings.auth.secret = "middleware-secret".to_string();
    settings.auth.hash_cost = crate::auth::MIN_HASH_COST;
    AppState::new(Arc::new(MemoryAccountStore::new()), settings).unwrap()
}

async fn whoami(Extension(caller): Extension<AuthenticatedAccount>) -> String {
    caller.id.to_string()
}

fn gated_router(state: AppState) -> Router {
    Router::new()
        .route("/private", get(whoami))
        .route_layer(from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

fn request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/private");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn test_bearer_token_parsing() {
    assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
    assert_eq!(bearer_token(&headers("Bearer   abc  ")), Some("abc"));

    assert_eq!(bearer_token(&HeaderMap::new()), None);
    assert_eq!(bearer_token(&headers("Bearer")), None);
    assert_eq!(bearer_token(&headers("Bearer ")), None);
    assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
    assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
}

#[tokio::test]
async fn test_missing_header_is_denied() {
    let app = gated_router(test_state());
    let response = app.oneshot(request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_denied() {
    let app = gated_router(test_state());
    let response = app
        .oneshot(request(Some("Basic dXNlcjpwYXNz")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let app = gated_router(test_state());
    let response = app
        .oneshot(request(Some("Bearer not-a-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_from_other_secret_is_invalid() {
    let state = test_state();
    let foreign = crate::auth::TokenIssuer::new("someone-else", None)
        .unwrap()
        .issue(Uuid::new_v4())
        .unwrap();

    let response = gated_router(state)
        .oneshot(request(Some(&format!("Bearer {foreign}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_valid_token_is_admitted_with_identity() {
    let state = test_state();
    let id = Uuid::new_v4();
    let token = state.tokens.issue(id).unwrap();

    let response = gated_router(state)
        .oneshot(request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], id.to_string().as_bytes());
}
