//! Domain models for the ledger service.

pub mod account;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountId, CardNumber, NewAccount, mask_card};
pub use money::Money;
pub use transaction::{FailureReason, TransactionId, TransactionOutcome};
