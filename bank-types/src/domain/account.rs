//! Account domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money::Money;
use crate::error::DomainError;

/// Store-assigned identifier for an Account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Longest primary account number allowed by ISO/IEC 7812.
const MAX_CARD_DIGITS: usize = 19;

/// Card identifier used as the payment lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct CardNumber(String);

impl CardNumber {
    /// Parses a card number: 1 to 19 ASCII digits, surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidCardNumber(
                "card number cannot be empty".into(),
            ));
        }
        if trimmed.len() > MAX_CARD_DIGITS {
            return Err(DomainError::InvalidCardNumber(format!(
                "card number longer than {} digits",
                MAX_CARD_DIGITS
            )));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidCardNumber(
                "card number must contain digits only".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe form showing only the last four digits.
    pub fn masked(&self) -> String {
        mask_card(&self.0)
    }
}

/// Masks all but the last four characters of a (possibly invalid) card string.
pub fn mask_card(raw: &str) -> String {
    let visible: String = raw
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", visible)
}

impl TryFrom<String> for CardNumber {
    type Error = DomainError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        CardNumber::parse(&raw)
    }
}

impl From<CardNumber> for String {
    fn from(card: CardNumber) -> Self {
        card.0
    }
}

impl std::fmt::Display for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated mutable fields of an account.
///
/// Used as the create payload and, paired with an id, as the full
/// replacement written by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub balance: Money,
    pub card_number: CardNumber,
    pub is_card_active: bool,
}

impl NewAccount {
    /// # Validation
    /// - Name cannot be empty
    /// - Card number must parse
    /// - Balance cannot be negative
    pub fn new(
        name: String,
        balance: i64,
        card_number: &str,
        is_card_active: bool,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Account name cannot be empty".into(),
            ));
        }

        Ok(Self {
            name,
            balance: Money::new(balance)?,
            card_number: CardNumber::parse(card_number)?,
            is_card_active,
        })
    }
}

/// A card-holding account with a balance that never goes negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// Store-assigned identifier
    #[schema(value_type = i64, example = 1)]
    pub id: AccountId,
    /// Account holder name
    #[schema(example = "Alice")]
    pub name: String,
    /// Balance in minor units (cents)
    #[schema(value_type = i64, example = 10000)]
    pub balance: Money,
    /// Unique card identifier used for payments
    #[serde(rename = "cardnumber", alias = "card_number")]
    #[schema(value_type = String, example = "4111")]
    pub card_number: CardNumber,
    #[serde(rename = "iscardactive", alias = "is_card_active")]
    pub is_card_active: bool,
}

impl Account {
    /// Creates an account with all fields specified (for database reconstruction).
    pub fn from_parts(id: AccountId, fields: NewAccount) -> Self {
        Self {
            id,
            name: fields.name,
            balance: fields.balance,
            card_number: fields.card_number,
            is_card_active: fields.is_card_active,
        }
    }

    /// Solvency check: the balance must stay strictly positive after the debit.
    ///
    /// Returns the balance the account would have. A debit that exactly
    /// exhausts the balance is rejected.
    pub fn authorize_debit(&self, amount: Money) -> Result<Money, DomainError> {
        let remaining = self.balance.checked_sub(amount)?;
        if remaining.is_zero() {
            return Err(DomainError::InsufficientFunds {
                available: self.balance.amount(),
                requested: amount.amount(),
            });
        }
        Ok(remaining)
    }

    /// Debits (subtracts) money from this in-memory copy.
    pub fn debit(&mut self, amount: Money) -> Result<(), DomainError> {
        self.balance = self.authorize_debit(amount)?;
        Ok(())
    }
}
