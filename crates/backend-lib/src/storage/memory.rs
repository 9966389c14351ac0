// ============================
// crates/backend-lib/src/storage/memory.rs
// ============================
//! In-process account store. Contents are lost on restart.
use accounts_common::AccountId;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Account, AccountIndex, AccountStore, NewAccount, StoreError};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<AccountIndex>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write();
        if let Some(field) = accounts.conflict(&account.name, &account.email) {
            return Err(StoreError::Duplicate(field));
        }
        let account = Account::from_new(account);
        accounts
            .insert(account.clone())
            .map_err(StoreError::Duplicate)?;
        Ok(account)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().by_name(name).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().by_email(email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::new_account;
    use crate::storage::UniqueField;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryAccountStore::new();
        let created = store.create(new_account("alice", "a@x.com")).await.unwrap();

        let by_name = store.find_by_name("alice").await.unwrap().unwrap();
        let by_email = store.find_by_email("a@x.com").await.unwrap().unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(by_name.id, created.id);
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_id.password_hash, created.password_hash);
        assert_eq!(store.find_profile(created.id).await.unwrap(), Some(created.profile()));

        assert!(store.find_by_name("bob").await.unwrap().is_none());
        assert!(store.find_by_id(uuid::Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicates_are_rejected() {
        let store = MemoryAccountStore::new();
        store.create(new_account("alice", "a@x.com")).await.unwrap();

        let err = store.create(new_account("bob", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(UniqueField::Email)));

        let err = store.create(new_account("alice", "b@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(UniqueField::Name)));

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_email_unique() {
        let store = Arc::new(MemoryAccountStore::new());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .create(new_account(&format!("user{i}"), "same@x.com"))
                    .await
                    .is_ok()
            }));
        }

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.len(), 1);
    }
}
