use super::locks::UserLocks;
use crate::domain::account::{Account, Amount, Balance};
use crate::domain::ports::AccountStoreBox;
use crate::error::{EconomyError, Result};

/// Owns per-user coin balances.
///
/// `Ledger` holds the account storage backend and serializes every
/// read-modify-write sequence per user, so balances never go negative even
/// under concurrent callers.
pub struct Ledger {
    account_store: AccountStoreBox,
    locks: UserLocks,
}

impl Ledger {
    /// Creates a new `Ledger` on top of the given account store.
    pub fn new(account_store: AccountStoreBox) -> Self {
        Self {
            account_store,
            locks: UserLocks::new(),
        }
    }

    /// Returns the user's current balance, creating the account with a zero
    /// balance if it does not exist yet.
    pub async fn get_balance(&self, user: &str) -> Result<Balance> {
        let _guard = self.locks.acquire(user).await;
        match self.account_store.get(user).await? {
            Some(account) => Ok(account.balance),
            None => {
                let account = Account::new(user);
                self.account_store.store(account.clone()).await?;
                Ok(account.balance)
            }
        }
    }

    /// Adds `amount` to the user's balance and returns the new balance.
    pub async fn credit(&self, user: &str, amount: Amount) -> Result<Balance> {
        let _guard = self.locks.acquire(user).await;
        let mut account = self
            .account_store
            .get(user)
            .await?
            .unwrap_or_else(|| Account::new(user));

        account.credit(amount);
        let balance = account.balance;
        self.account_store.store(account).await?;

        tracing::debug!(user, amount = amount.value(), %balance, "credited");
        Ok(balance)
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// Returns `Ok(false)` without mutating anything when the source balance
    /// does not cover `amount`. Transferring to oneself is a validation
    /// error. Both sides are written as a single all-or-nothing store
    /// operation.
    pub async fn transfer(&self, from: &str, to: &str, amount: Amount) -> Result<bool> {
        if from == to {
            return Err(EconomyError::ValidationError(
                "Cannot transfer to the same account".to_string(),
            ));
        }

        // Both user locks, in lexicographic order so two opposite-direction
        // transfers cannot deadlock.
        let (first, second) = if from < to { (from, to) } else { (to, from) };
        let _guard_first = self.locks.acquire(first).await;
        let _guard_second = self.locks.acquire(second).await;

        let mut source = self
            .account_store
            .get(from)
            .await?
            .unwrap_or_else(|| Account::new(from));

        if !source.debit(amount) {
            tracing::debug!(from, to, amount = amount.value(), "transfer rejected");
            return Ok(false);
        }

        let mut destination = self
            .account_store
            .get(to)
            .await?
            .unwrap_or_else(|| Account::new(to));
        destination.credit(amount);

        self.account_store
            .store_many(vec![source, destination])
            .await?;

        tracing::info!(from, to, amount = amount.value(), "transfer complete");
        Ok(true)
    }

    /// Returns up to `limit` accounts ordered by balance, richest first.
    /// Ties are broken by user id for a stable order.
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<Account>> {
        let mut accounts = self.account_store.get_all().await?;
        accounts.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.user.cmp(&b.user)));
        accounts.truncate(limit);
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryAccountStore;

    fn ledger() -> Ledger {
        Ledger::new(Box::new(InMemoryAccountStore::new()))
    }

    fn amount(value: i64) -> Amount {
        Amount::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_get_balance_creates_account() {
        let ledger = ledger();
        assert_eq!(ledger.get_balance("alice").await.unwrap(), Balance::ZERO);
        // The implicitly created account shows up in the full listing.
        let all = ledger.leaderboard(usize::MAX).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user, "alice");
    }

    #[tokio::test]
    async fn test_credit_returns_new_balance() {
        let ledger = ledger();
        assert_eq!(
            ledger.credit("alice", amount(100)).await.unwrap(),
            Balance::new(100)
        );
        assert_eq!(
            ledger.credit("alice", amount(50)).await.unwrap(),
            Balance::new(150)
        );
    }

    #[tokio::test]
    async fn test_transfer_success_conserves_total() {
        let ledger = ledger();
        ledger.credit("alice", amount(500)).await.unwrap();

        assert!(ledger.transfer("alice", "bob", amount(200)).await.unwrap());
        assert_eq!(
            ledger.get_balance("alice").await.unwrap(),
            Balance::new(300)
        );
        assert_eq!(ledger.get_balance("bob").await.unwrap(), Balance::new(200));
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds_mutates_nothing() {
        let ledger = ledger();
        ledger.credit("alice", amount(100)).await.unwrap();

        assert!(!ledger.transfer("alice", "bob", amount(101)).await.unwrap());
        assert_eq!(
            ledger.get_balance("alice").await.unwrap(),
            Balance::new(100)
        );
        assert_eq!(ledger.get_balance("bob").await.unwrap(), Balance::ZERO);
    }

    #[tokio::test]
    async fn test_transfer_exact_balance_succeeds() {
        let ledger = ledger();
        ledger.credit("alice", amount(100)).await.unwrap();

        assert!(ledger.transfer("alice", "bob", amount(100)).await.unwrap());
        assert_eq!(ledger.get_balance("alice").await.unwrap(), Balance::ZERO);
        assert_eq!(ledger.get_balance("bob").await.unwrap(), Balance::new(100));
    }

    #[tokio::test]
    async fn test_transfer_from_missing_account_fails() {
        let ledger = ledger();
        assert!(!ledger.transfer("ghost", "bob", amount(1)).await.unwrap());
        assert_eq!(ledger.get_balance("bob").await.unwrap(), Balance::ZERO);
    }

    #[tokio::test]
    async fn test_transfer_to_self_is_rejected() {
        let ledger = ledger();
        ledger.credit("alice", amount(100)).await.unwrap();

        let result = ledger.transfer("alice", "alice", amount(10)).await;
        assert!(matches!(result, Err(EconomyError::ValidationError(_))));
        assert_eq!(
            ledger.get_balance("alice").await.unwrap(),
            Balance::new(100)
        );
    }

    #[tokio::test]
    async fn test_leaderboard_order_and_limit() {
        let ledger = ledger();
        ledger.credit("alice", amount(50)).await.unwrap();
        ledger.credit("bob", amount(200)).await.unwrap();
        ledger.credit("carol", amount(200)).await.unwrap();
        ledger.credit("dave", amount(10)).await.unwrap();

        let top = ledger.leaderboard(3).await.unwrap();
        let users: Vec<&str> = top.iter().map(|a| a.user.as_str()).collect();
        // Ties (bob/carol) resolve by user id.
        assert_eq!(users, vec!["bob", "carol", "alice"]);
    }
}
