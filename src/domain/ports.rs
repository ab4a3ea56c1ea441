use super::account::Account;
use super::claim::DailyClaimRecord;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn store(&self, account: Account) -> Result<()>;
    /// Persists several accounts as one all-or-nothing write.
    async fn store_many(&self, accounts: Vec<Account>) -> Result<()>;
    async fn get(&self, user: &str) -> Result<Option<Account>>;
    async fn get_all(&self) -> Result<Vec<Account>>;
}

#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn store(&self, record: DailyClaimRecord) -> Result<()>;
    async fn get(&self, user: &str) -> Result<Option<DailyClaimRecord>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type ClaimStoreBox = Box<dyn ClaimStore>;
