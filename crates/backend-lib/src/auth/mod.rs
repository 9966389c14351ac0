// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod token;

pub use password::{CredentialHasher, HashError, DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST};
pub use token::{Claims, TokenError, TokenIssuer};
