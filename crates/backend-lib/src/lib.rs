// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core of the account service: password hashing, bearer tokens, the access
//! gate for protected routes, account storage and the HTTP handlers tying
//! them together.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod storage;
pub mod telemetry;
pub mod validation;

use std::sync::Arc;

use crate::auth::{CredentialHasher, TokenIssuer};
use crate::config::{Settings, StorageBackend};
use crate::storage::{AccountStore, FlatFileAccountStore, MemoryAccountStore};

pub use crate::error::AppError;
pub use crate::routes::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Account storage backend
    pub accounts: Arc<dyn AccountStore>,
    /// Password hasher
    pub hasher: CredentialHasher,
    /// Token issuer/verifier holding the signing secret
    pub tokens: Arc<TokenIssuer>,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over an existing store
    pub fn new(accounts: Arc<dyn AccountStore>, settings: Settings) -> anyhow::Result<Self> {
        let hasher = CredentialHasher::new(settings.auth.hash_cost)?;
        let tokens = Arc::new(TokenIssuer::new(
            &settings.auth.secret,
            settings.auth.token_ttl(),
        )?);

        Ok(Self {
            accounts,
            hasher,
            tokens,
            settings: Arc::new(settings),
        })
    }

    /// Create a new application state, opening the configured store
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let accounts: Arc<dyn AccountStore> = match settings.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryAccountStore::new()),
            StorageBackend::FlatFile => {
                Arc::new(FlatFileAccountStore::new(&settings.storage.path)?)
            }
        };
        Self::new(accounts, settings)
    }
}
