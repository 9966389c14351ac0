// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the account service.

pub mod auth;

pub use auth::{bearer_token, require_bearer, AuthenticatedAccount};

#[cfg(test)]
mod middleware_tests;
