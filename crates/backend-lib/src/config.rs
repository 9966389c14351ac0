// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. a TOML file (`config.toml` unless another path is given)
//! 3. the legacy `SECRET` environment variable, mapped to `auth.secret`
//! 4. `ACCOUNTS_*` environment variables, `__` separating nested keys
//!    (`ACCOUNTS_AUTH__SECRET`, `ACCOUNTS_STORAGE__BACKEND`, ...)
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST};

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "ACCOUNTS_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level, overridden by `RUST_LOG` when set
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Token and password settings
    pub auth: AuthSettings,
    /// Account storage settings
    pub storage: StorageSettings,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Authentication settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC secret used to sign and verify bearer tokens
    pub secret: String,
    /// scrypt work factor for new password hashes
    pub hash_cost: u8,
    /// Token lifetime in seconds; unset means tokens never expire
    pub token_ttl_secs: Option<u64>,
    /// Who may read a profile by id
    pub profile_access: ProfileAccess,
}

/// Profile read policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileAccess {
    /// Any valid token may read any profile
    AnyAuthenticated,
    /// A token may only read the profile of its own subject
    OwnerOnly,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Root directory for the flat-file backend
    pub path: PathBuf,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    FlatFile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5028)),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            auth: AuthSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            hash_cost: DEFAULT_HASH_COST,
            token_ttl_secs: None,
            profile_access: ProfileAccess::AnyAuthenticated,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::FlatFile,
            path: PathBuf::from("data"),
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("hash_cost", &self.hash_cost)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("profile_access", &self.profile_access)
            .finish()
    }
}

impl AuthSettings {
    /// Token lifetime as a `Duration`
    pub fn token_ttl(&self) -> Option<Duration> {
        self.token_ttl_secs.map(Duration::from_secs)
    }
}

impl Settings {
    /// Load settings from the default file and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from `path` and the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::figment(path.as_ref()).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::raw().only(&["SECRET"]).map(|_| "auth.secret".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.secret.is_empty() {
            bail!("auth.secret must be set (ACCOUNTS_AUTH__SECRET or SECRET)");
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.auth.hash_cost) {
            bail!(
                "auth.hash_cost must be between {MIN_HASH_COST} and {MAX_HASH_COST}, got {}",
                self.auth.hash_cost
            );
        }
        if self.auth.token_ttl_secs == Some(0) {
            bail!("auth.token_ttl_secs must be positive when set");
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("unknown log level {:?}", self.log_level);
        }
        Ok(())
    }
}
