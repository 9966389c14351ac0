// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
/** Bearer token issuance and verification.
Tokens are HS256 JWTs whose `sub` claim is the account id. Nothing is stored
server-side: a token is valid for as long as its signature checks out against
the process secret and, when a TTL is configured, its `exp` is in the future. */
use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from issuing or verifying a token
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),

    #[error("token subject is not an account id")]
    InvalidSubject,
}

/// Claims carried by every token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiry (Unix timestamp), only present when a TTL is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Signs and verifies bearer tokens with a server-held secret
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenIssuer {
    /** Create an issuer for `secret`.
    # Arguments
    * `secret` - Shared HMAC secret, must be non-empty
    * `ttl` - Token lifetime; `None` issues tokens that never expire */
    pub fn new(secret: &str, ttl: Option<Duration>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = ttl.is_some();
        if ttl.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Lifetime of issued tokens, if any
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Mint a token for `account_id`
    pub fn issue(&self, account_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now,
            exp: self.ttl.map(|ttl| now + ttl.as_secs()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    /** Verify a presented token and return the account id it was issued for.
    Any structural, signature or expiry problem is a `TokenError`; this never panics. */
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::Rejected)?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::InvalidSubject)
    }
}
