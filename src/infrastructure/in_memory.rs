use crate::domain::account::Account;
use crate::domain::claim::DailyClaimRecord;
use crate::domain::ports::{AccountStore, ClaimStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for accounts.
///
/// Uses `Arc<RwLock<HashMap>>` to allow shared concurrent access. Ideal for
/// testing or ephemeral runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn store(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.user.clone(), account);
        Ok(())
    }

    async fn store_many(&self, batch: Vec<Account>) -> Result<()> {
        // One write lock for the whole batch, so readers never observe a
        // partially applied transfer.
        let mut accounts = self.accounts.write().await;
        for account in batch {
            accounts.insert(account.user.clone(), account);
        }
        Ok(())
    }

    async fn get(&self, user: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(user).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for daily claim records.
#[derive(Default, Clone)]
pub struct InMemoryClaimStore {
    records: Arc<RwLock<HashMap<String, DailyClaimRecord>>>,
}

impl InMemoryClaimStore {
    /// Creates a new, empty in-memory claim store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn store(&self, record: DailyClaimRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.user.clone(), record);
        Ok(())
    }

    async fn get(&self, user: &str) -> Result<Option<DailyClaimRecord>> {
        let records = self.records.read().await;
        Ok(records.get(user).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_in_memory_account_store() {
        let store = InMemoryAccountStore::new();
        let mut account = Account::new("alice");
        account.balance = Balance::new(100);

        store.store(account.clone()).await.unwrap();
        let retrieved = store.get("alice").await.unwrap().unwrap();
        assert_eq!(retrieved, account);

        assert!(store.get("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_account_store_many() {
        let store = InMemoryAccountStore::new();
        let mut alice = Account::new("alice");
        alice.balance = Balance::new(30);
        let mut bob = Account::new("bob");
        bob.balance = Balance::new(70);

        store.store_many(vec![alice, bob]).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(
            store.get("bob").await.unwrap().unwrap().balance,
            Balance::new(70)
        );
    }

    #[tokio::test]
    async fn test_in_memory_claim_store() {
        let store = InMemoryClaimStore::new();
        let record = DailyClaimRecord {
            user: "alice".to_string(),
            last_claimed_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            streak: 3,
        };

        store.store(record.clone()).await.unwrap();
        let retrieved = store.get("alice").await.unwrap().unwrap();
        assert_eq!(retrieved, record);

        assert!(store.get("bob").await.unwrap().is_none());
    }
}
