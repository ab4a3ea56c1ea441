use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Coins paid for every successful claim, before any streak bonus.
pub const BASE_REWARD: i64 = 100;
/// Extra coins per consecutive day already on the streak.
pub const STREAK_BONUS_PER_DAY: i64 = 10;
/// Bonus days stop accruing here; the stored streak itself is unbounded.
pub const STREAK_BONUS_CAP_DAYS: i64 = 100;
/// Minimum gap between two successful claims.
pub const CLAIM_COOLDOWN: TimeDelta = TimeDelta::hours(24);
/// A gap longer than this resets the streak to 1.
pub const STREAK_RESET_WINDOW: TimeDelta = TimeDelta::hours(48);

/// Per-user claim cadence state. Created on the first successful claim,
/// then updated in place; no record means the user has never claimed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct DailyClaimRecord {
    pub user: String,
    pub last_claimed_at: DateTime<Utc>,
    /// Consecutive qualifying claims, >= 1 once the record exists.
    pub streak: u32,
}

/// What a claim attempt should do, decided purely from the stored record
/// and the claim time. Persisting and paying is the caller's job.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ClaimDecision {
    /// Claimed too recently; eligible again at the carried timestamp.
    OnCooldown { next_eligible_at: DateTime<Utc> },
    /// Pay out and store this streak value.
    Payable { streak: u32 },
}

/// Evaluates a claim attempt at `now` against the user's stored record.
///
/// Boundaries: an elapsed gap of exactly [`CLAIM_COOLDOWN`] is eligible,
/// and exactly [`STREAK_RESET_WINDOW`] still continues the streak.
pub fn evaluate_claim(record: Option<&DailyClaimRecord>, now: DateTime<Utc>) -> ClaimDecision {
    let Some(record) = record else {
        return ClaimDecision::Payable { streak: 1 };
    };

    let elapsed = now - record.last_claimed_at;
    if elapsed < CLAIM_COOLDOWN {
        ClaimDecision::OnCooldown {
            next_eligible_at: record.last_claimed_at + CLAIM_COOLDOWN,
        }
    } else if elapsed > STREAK_RESET_WINDOW {
        // Streak lapsed: same payout as a fresh start, but the record row
        // is updated in place rather than recreated.
        ClaimDecision::Payable { streak: 1 }
    } else {
        ClaimDecision::Payable {
            streak: record.streak + 1,
        }
    }
}

/// Coins paid for a claim that lands the user on `streak`.
///
/// The cap applies to bonus days credited, not the streak itself.
pub fn reward_for_streak(streak: u32) -> i64 {
    let bonus_days = i64::from(streak.saturating_sub(1)).min(STREAK_BONUS_CAP_DAYS);
    BASE_REWARD + bonus_days * STREAK_BONUS_PER_DAY
}
