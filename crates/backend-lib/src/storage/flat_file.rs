// ============================
// crates/backend-lib/src/storage/flat_file.rs
// ============================
//! Flat-file account store.
//!
//! Layout: `<root>/accounts/<id>.json`, one pretty-printed document per
//! account. All documents are loaded into an index when the store is opened;
//! lookups are served from the index and `create` writes through to disk.
//! Opening fails if two documents share a name or email.
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use accounts_common::AccountId;
use async_trait::async_trait;
use tokio::{fs as tokio_fs, sync::RwLock};

use super::{Account, AccountIndex, AccountStore, NewAccount, StoreError};

/// Flat-file implementation of the AccountStore trait
pub struct FlatFileAccountStore {
    dir: PathBuf,
    index: RwLock<AccountIndex>,
}

impl FlatFileAccountStore {
    /// Open (or create) a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let dir = root.as_ref().join("accounts");
        fs::create_dir_all(&dir)?;

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension() == Some(OsStr::new("json")) {
                paths.push(path);
            }
        }
        // sorted so the same file is reported for a given duplicate
        paths.sort();

        let mut index = AccountIndex::default();
        for path in paths {
            let content = fs::read_to_string(&path)?;
            let account: Account = serde_json::from_str(&content)?;
            if let Err(field) = index.insert(account) {
                tracing::error!(path = %path.display(), %field, "duplicate account document");
                return Err(StoreError::DuplicateOnDisk { path, field });
            }
        }
        tracing::debug!(dir = %dir.display(), accounts = index.len(), "opened account store");

        Ok(Self {
            dir,
            index: RwLock::new(index),
        })
    }

    fn account_path(&self, id: AccountId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

/// Write `contents` to `path` through a sibling temp file, so a reader never
/// sees a partial document. The temp file is removed on failure.
async fn write_atomically(path: &Path, contents: Vec<u8>) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    let written = match tokio_fs::write(&tmp, contents).await {
        Ok(()) => tokio_fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio_fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl AccountStore for FlatFileAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        // held across the write so concurrent creates cannot both pass the uniqueness check
        let mut index = self.index.write().await;
        if let Some(field) = index.conflict(&account.name, &account.email) {
            return Err(StoreError::Duplicate(field));
        }

        let account = Account::from_new(account);
        let json = serde_json::to_vec_pretty(&account)?;
        write_atomically(&self.account_path(account.id), json).await?;

        index
            .insert(account.clone())
            .map_err(StoreError::Duplicate)?;
        Ok(account)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.index.read().await.by_name(name).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.index.read().await.by_email(email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.index.read().await.get(&id).cloned())
    }
}
