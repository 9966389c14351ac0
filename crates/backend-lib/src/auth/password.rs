// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are scrypt PHC strings (`$scrypt$ln=15,r=8,p=1$<salt>$<hash>`), so
//! every stored hash carries the algorithm, cost and salt it was made with.
//! Verification always uses the parameters embedded in the stored hash, which
//! keeps old hashes valid when the configured cost changes.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use thiserror::Error;
use zeroize::Zeroize;

/// Default scrypt work factor (log2 of the CPU/memory cost)
pub const DEFAULT_HASH_COST: u8 = 15;

/// Lowest work factor accepted from configuration
pub const MIN_HASH_COST: u8 = 10;

/// Highest work factor accepted from configuration
pub const MAX_HASH_COST: u8 = 20;

const BLOCK_SIZE: u32 = 8;
const PARALLELISM: u32 = 1;

/// Errors raised while producing a hash
#[derive(Error, Debug)]
pub enum HashError {
    #[error("password must not be empty")]
    EmptyPassword,

    #[error("invalid scrypt parameters: {0}")]
    InvalidParams(String),

    #[error("hashing failed: {0}")]
    Hash(String),
}

/// Salted, cost-parameterised password hasher
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Create a hasher with the given work factor
    pub fn new(cost: u8) -> Result<Self, HashError> {
        let params = Params::new(cost, BLOCK_SIZE, PARALLELISM, Params::RECOMMENDED_LEN)
            .map_err(|e| HashError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    /// Work factor new hashes are produced with
    pub fn cost(&self) -> u8 {
        self.params.log_n()
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<String, HashError> {
        if plain.is_empty() {
            return Err(HashError::EmptyPassword);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Hash a password, then zeroize the caller's plaintext.
    ///
    /// The plaintext is wiped whether or not hashing succeeds.
    pub fn hash_secure(&self, plain: &mut String) -> Result<String, HashError> {
        let result = self.hash(plain);
        plain.zeroize();
        result
    }

    /// Check a candidate password against a stored hash.
    ///
    /// Returns `false` for an empty candidate, a malformed hash or a mismatch.
    /// The digest comparison is constant-time.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        if plain.is_empty() {
            return false;
        }
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }
}
