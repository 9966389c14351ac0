// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Account persistence.
//!
//! [`AccountStore`] is the only shared resource between requests. Each
//! implementation provides its own concurrency control; `create` enforces
//! name and email uniqueness atomically and either persists the whole record
//! or nothing.
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use accounts_common::{AccountId, AccountProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod flat_file;
pub mod memory;

pub use flat_file::FlatFileAccountStore;
pub use memory::MemoryAccountStore;

/// Fields that must be unique across all accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Name,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Name => f.write_str("name"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}

/// Storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("an account with this {0} already exists")]
    Duplicate(UniqueField),

    #[error("{} holds a second account with this {field}", path.display())]
    DuplicateOnDisk { path: PathBuf, field: UniqueField },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored account, including its password hash
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    fn from_new(new: NewAccount) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        }
    }

    /// The account without its password hash
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input to [`AccountStore::create`]. The hash must come from the credential hasher.
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Trait for account storage backends
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account, assigning its id and creation time
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Find an account by its login name
    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, StoreError>;

    /// Find an account by email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Find an account by id
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Find an account by id, without its password hash
    async fn find_profile(&self, id: AccountId) -> Result<Option<AccountProfile>, StoreError> {
        Ok(self.find_by_id(id).await?.map(|account| account.profile()))
    }
}

/// Accounts keyed by id, with the name and email unique indexes kept
/// alongside. Callers hold one lock over the whole index so the three maps
/// never disagree.
#[derive(Default)]
struct AccountIndex {
    by_id: HashMap<AccountId, Account>,
    by_name: HashMap<String, AccountId>,
    by_email: HashMap<String, AccountId>,
}

impl AccountIndex {
    /// Unique field an account with `name` and `email` would collide with.
    /// Email is checked first.
    fn conflict(&self, name: &str, email: &str) -> Option<UniqueField> {
        if self.by_email.contains_key(email) {
            Some(UniqueField::Email)
        } else if self.by_name.contains_key(name) {
            Some(UniqueField::Name)
        } else {
            None
        }
    }

    /// Add an account, refusing it if either unique field is taken
    fn insert(&mut self, account: Account) -> Result<(), UniqueField> {
        if let Some(field) = self.conflict(&account.name, &account.email) {
            return Err(field);
        }
        self.by_name.insert(account.name.clone(), account.id);
        self.by_email.insert(account.email.clone(), account.id);
        self.by_id.insert(account.id, account);
        Ok(())
    }

    fn get(&self, id: &AccountId) -> Option<&Account> {
        self.by_id.get(id)
    }

    fn by_name(&self, name: &str) -> Option<&Account> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    fn by_email(&self, email: &str) -> Option<&Account> {
        self.by_email.get(email).and_then(|id| self.by_id.get(id))
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }
}
