use crate::domain::account::Account;
use crate::domain::claim::DailyClaimRecord;
use crate::domain::ports::{AccountStore, ClaimStore};
use crate::error::{EconomyError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing account balances.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing daily claim records.
pub const CF_DAILY_CLAIMS: &str = "daily_claims";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for both `Account` and `DailyClaimRecord` entities using
/// separate Column Families. Multi-account writes go through a `WriteBatch`
/// so a transfer persists all-or-nothing.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("accounts" and
    /// "daily_claims") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let cf_claims = ColumnFamilyDescriptor::new(CF_DAILY_CLAIMS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts, cf_claims])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            EconomyError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| {
            EconomyError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {e}"),
            )))
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| {
            EconomyError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {e}"),
            )))
        })
    }
}

#[async_trait]
impl AccountStore for RocksDbStore {
    async fn store(&self, account: Account) -> Result<()> {
        let cf = self.cf_handle(CF_ACCOUNTS)?;
        let value = Self::encode(&account)?;
        self.db.put_cf(cf, account.user.as_bytes(), value)?;
        Ok(())
    }

    async fn store_many(&self, accounts: Vec<Account>) -> Result<()> {
        let cf = self.cf_handle(CF_ACCOUNTS)?;
        let mut batch = WriteBatch::default();
        for account in &accounts {
            batch.put_cf(cf, account.user.as_bytes(), Self::encode(account)?);
        }
        self.db.write(batch)?;
        Ok(())
    }

    async fn get(&self, user: &str) -> Result<Option<Account>> {
        let cf = self.cf_handle(CF_ACCOUNTS)?;
        match self.db.get_cf(cf, user.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Account>> {
        let cf = self.cf_handle(CF_ACCOUNTS)?;

        let mut accounts = Vec::new();
        let iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::Start);

        for item in iter {
            let (_key, value) = item?;
            accounts.push(Self::decode(&value)?);
        }

        Ok(accounts)
    }
}

#[async_trait]
impl ClaimStore for RocksDbStore {
    async fn store(&self, record: DailyClaimRecord) -> Result<()> {
        let cf = self.cf_handle(CF_DAILY_CLAIMS)?;
        let value = Self::encode(&record)?;
        self.db.put_cf(cf, record.user.as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, user: &str) -> Result<Option<DailyClaimRecord>> {
        let cf = self.cf_handle(CF_DAILY_CLAIMS)?;
        match self.db.get_cf(cf, user.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }
}
