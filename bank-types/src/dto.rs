//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::NewAccount;
use crate::error::DomainError;

// ─────────────────────────────────────────────────────────────────────────────
// Account DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Body for creating an account, or replacing all of its fields on update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountRequest {
    /// Name of the account holder
    #[schema(example = "Alice")]
    pub name: String,
    /// Balance in smallest currency unit (e.g., cents)
    #[serde(default)]
    #[schema(example = 10000)]
    pub balance: i64,
    /// Unique card identifier
    #[serde(rename = "cardnumber", alias = "card_number")]
    #[schema(example = "4111")]
    pub card_number: String,
    #[serde(
        rename = "iscardactive",
        alias = "is_card_active",
        default = "default_card_active"
    )]
    pub is_card_active: bool,
}

fn default_card_active() -> bool {
    true
}

impl TryFrom<AccountRequest> for NewAccount {
    type Error = DomainError;

    fn try_from(req: AccountRequest) -> Result<Self, Self::Error> {
        NewAccount::new(req.name, req.balance, &req.card_number, req.is_card_active)
    }
}

/// Response after deleting an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletionResponse {
    #[schema(example = "successful deletion")]
    pub result: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to debit an account identified by its card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// Card to charge
    #[serde(alias = "cardnumber")]
    #[schema(example = "4111")]
    pub card_number: String,
    /// Amount to debit in smallest currency unit; must be positive
    #[schema(example = 4000)]
    pub amount: i64,
}
