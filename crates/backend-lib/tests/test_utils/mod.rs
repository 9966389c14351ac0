//! Test utilities for the account service integration tests
//!
//! Builds an `AppState` over an in-memory store with a cheap hash cost and
//! drives the router one request at a time.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use backend_lib::{
    auth::MIN_HASH_COST,
    config::Settings,
    create_router,
    storage::{Account, AccountStore, MemoryAccountStore, NewAccount, StoreError},
    AppState,
};
use serde_json::Value;
use std::io;
use std::sync::Arc;
use uuid::Uuid;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Settings valid for tests: known secret, lowest accepted hash cost
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.secret = TEST_SECRET.to_string();
    settings.auth.hash_cost = MIN_HASH_COST;
    settings
}

/// State over a fresh in-memory store
pub fn setup_state(settings: Settings) -> AppState {
    AppState::new(Arc::new(MemoryAccountStore::new()), settings)
        .expect("Failed to create AppState for test")
}

/// Router plus the state behind it
pub fn setup_app() -> (Router, AppState) {
    let state = setup_state(test_settings());
    (create_router(state.clone()), state)
}

/// Path that [`BrokenStore`] puts in its I/O errors
pub const BROKEN_STORE_DETAIL: &str = "/var/lib/accounts/disk-full";

/// Store whose writes always fail with an I/O error. Reads go to an empty
/// in-memory store unless `fail_reads` is set.
pub struct BrokenStore {
    pub inner: MemoryAccountStore,
    pub fail_reads: bool,
}

impl BrokenStore {
    pub fn new(fail_reads: bool) -> Self {
        Self {
            inner: MemoryAccountStore::new(),
            fail_reads,
        }
    }

    fn io_error() -> StoreError {
        StoreError::Io(io::Error::new(io::ErrorKind::Other, BROKEN_STORE_DETAIL))
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads {
            Err(Self::io_error())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AccountStore for BrokenStore {
    async fn create(&self, _account: NewAccount) -> Result<Account, StoreError> {
        Err(Self::io_error())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, StoreError> {
        self.check_read()?;
        self.inner.find_by_name(name).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.check_read()?;
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.check_read()?;
        self.inner.find_by_id(id).await
    }
}

/// Router over a [`BrokenStore`], plus the store for inspection
pub fn setup_broken_app(fail_reads: bool) -> (Router, Arc<BrokenStore>) {
    let store = Arc::new(BrokenStore::new(fail_reads));
    let state = AppState::new(store.clone(), test_settings())
        .expect("Failed to create AppState for test");
    (create_router(state), store)
}

/// Send a raw body with an optional `Content-Type` and return status and
/// parsed JSON body
pub async fn send_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    read_response(app, request).await
}

/// Send one request and return status and parsed JSON body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    read_response(app, request).await
}

async fn read_response(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn register(
    app: &Router,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> (StatusCode, Value) {
    let body = serde_json::json!({
        "name": name,
        "email": email,
        "password": password,
        "confirmpassword": confirm,
    });
    send(app, Method::POST, "/auth/register", Some(body), None).await
}

pub async fn login(app: &Router, name: &str, password: &str) -> (StatusCode, Value) {
    let body = serde_json::json!({ "name": name, "password": password });
    send(app, Method::POST, "/auth/login", Some(body), None).await
}

/// Register and log in, returning the token
pub async fn register_and_login(app: &Router, name: &str, email: &str, password: &str) -> String {
    let (status, _) = register(app, name, email, password, password).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = login(app, name, password).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}
