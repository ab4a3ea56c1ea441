use crate::error::EconomyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A coin balance, in whole coins.
///
/// This is a wrapper around `i64` to enforce domain-specific rules and
/// provide type safety for balance arithmetic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Balance(pub i64);

/// A positive coin amount for credits and transfers.
///
/// Ensures that operation amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, EconomyError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(EconomyError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = EconomyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn new(coins: i64) -> Self {
        Self(coins)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// Implement basic arithmetic for Balance to make it a usable Value Object
impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// A user's coin account.
///
/// Accounts are created implicitly on first reference and are never deleted.
/// The balance never goes negative: debits are conditional on coverage.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Account {
    /// Identifier from the external identity system.
    pub user: String,
    pub balance: Balance,
}

impl Account {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            balance: Balance::ZERO,
        }
    }

    /// Adds coins to the balance.
    pub fn credit(&mut self, amount: Amount) {
        self.balance += amount.into();
    }

    /// Removes coins from the balance if it covers `amount`.
    ///
    /// Returns `false` and leaves the balance untouched when funds are
    /// insufficient.
    pub fn debit(&mut self, amount: Amount) -> bool {
        let amount = Balance::from(amount);
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }
}
