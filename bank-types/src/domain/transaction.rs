//! Payment outcome types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Correlation token issued for every payment call.
///
/// Never persisted and never looked up later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random TransactionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a payment did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    #[serde(rename = "no_account_found")]
    NoAccountFound,
    InsufficientFunds,
    InvalidAmount,
    #[serde(rename = "internal_error")]
    Internal,
}

impl FailureReason {
    /// Stable wire code shared by every protocol adapter.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::NoAccountFound => "no_account_found",
            FailureReason::InsufficientFunds => "insufficient_funds",
            FailureReason::InvalidAmount => "invalid_amount",
            FailureReason::Internal => "internal_error",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of one payment call. The id is the same whether it succeeded or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransactionOutcome {
    #[schema(value_type = String, example = "123e4567-e89b-12d3-a456-426614174000")]
    pub transaction_id: TransactionId,
    pub success: bool,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl TransactionOutcome {
    pub fn success(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            success: true,
            failure: None,
        }
    }

    pub fn failure(transaction_id: TransactionId, reason: FailureReason) -> Self {
        Self {
            transaction_id,
            success: false,
            failure: Some(reason),
        }
    }
}
