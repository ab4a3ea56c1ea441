use super::ledger::Ledger;
use super::locks::UserLocks;
use crate::domain::account::{Amount, Balance};
use crate::domain::claim::{self, ClaimDecision, DailyClaimRecord};
use crate::domain::ports::ClaimStoreBox;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Result of a claim attempt.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ClaimOutcome {
    Claimed {
        amount: i64,
        streak: u32,
        new_balance: Balance,
    },
    OnCooldown {
        next_eligible_at: DateTime<Utc>,
    },
}

/// Gates daily reward claims and grows the per-user streak.
///
/// The engine owns the claim-record storage and delegates balance mutation
/// to the [`Ledger`]. One claim per user runs at a time: the record read,
/// the decision and the writes all happen under that user's claim lock.
pub struct DailyRewardEngine {
    claim_store: ClaimStoreBox,
    ledger: Arc<Ledger>,
    locks: UserLocks,
}

impl DailyRewardEngine {
    /// Creates a new engine on top of the given claim store and ledger.
    pub fn new(claim_store: ClaimStoreBox, ledger: Arc<Ledger>) -> Self {
        Self {
            claim_store,
            ledger,
            locks: UserLocks::new(),
        }
    }

    /// Attempts a daily claim for `user` at `now`.
    ///
    /// On success the reward is credited to the user's account and the claim
    /// record is updated; the returned outcome carries the paid amount, the
    /// streak after this claim and the post-credit balance. A claim inside
    /// the cooldown window mutates nothing and reports when the next claim
    /// becomes eligible.
    pub async fn claim(&self, user: &str, now: DateTime<Utc>) -> Result<ClaimOutcome> {
        let _guard = self.locks.acquire(user).await;
        let record = self.claim_store.get(user).await?;

        match claim::evaluate_claim(record.as_ref(), now) {
            ClaimDecision::OnCooldown { next_eligible_at } => {
                tracing::debug!(user, %next_eligible_at, "claim on cooldown");
                Ok(ClaimOutcome::OnCooldown { next_eligible_at })
            }
            ClaimDecision::Payable { streak } => {
                let amount = Amount::new(claim::reward_for_streak(streak))?;
                let new_balance = self.ledger.credit(user, amount).await?;
                self.claim_store
                    .store(DailyClaimRecord {
                        user: user.to_string(),
                        last_claimed_at: now,
                        streak,
                    })
                    .await?;

                tracing::info!(user, amount = amount.value(), streak, "daily claimed");
                Ok(ClaimOutcome::Claimed {
                    amount: amount.value(),
                    streak,
                    new_balance,
                })
            }
        }
    }
}
