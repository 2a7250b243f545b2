//! Exact monetary value in minor units.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Non-negative amount stored in the smallest currency unit (cents).
///
/// Balances never go through floating point; the store persists the same
/// integer that lives here.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    /// Creates a new Money value.
    pub fn new(amount: i64) -> Result<Self, DomainError> {
        if amount < 0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self(amount))
    }

    /// Returns the amount in minor units.
    pub fn amount(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked subtraction - returns error if the result would be negative.
    pub fn checked_sub(&self, other: Money) -> Result<Money, DomainError> {
        if self.0 < other.0 {
            return Err(DomainError::InsufficientFunds {
                available: self.0,
                requested: other.0,
            });
        }
        Ok(Money(self.0 - other.0))
    }
}

impl TryFrom<i64> for Money {
    type Error = DomainError;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        Money::new(amount)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
