//! Account store port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory) implement this trait.

use crate::domain::{Account, AccountId, CardNumber, Money, NewAccount};
use crate::error::RepoError;

/// Persistence contract for accounts.
///
/// Every value reaching the backend is bound as a statement parameter.
/// Balance mutations from payments go through [`AccountStore::debit_by_card`],
/// which must be a single atomic compare-and-decrement.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Exact match on the unique card number.
    ///
    /// More than one matching row is a `RepoError::Integrity`.
    async fn find_by_card_number(&self, card: &CardNumber) -> Result<Option<Account>, RepoError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepoError>;

    /// Full snapshot of all accounts, ordered by id.
    async fn list_accounts(&self) -> Result<Vec<Account>, RepoError>;

    /// Inserts a new account; the store assigns the id.
    ///
    /// A duplicate card number is a `RepoError::Conflict`.
    async fn create_account(&self, account: NewAccount) -> Result<Account, RepoError>;

    /// Replaces all mutable fields of the row matching `account.id`.
    ///
    /// Fails with `RepoError::NotFound` when zero rows match.
    async fn update_account(&self, account: &Account) -> Result<(), RepoError>;

    /// Fails with `RepoError::NotFound` when zero rows match.
    async fn delete_account(&self, id: AccountId) -> Result<(), RepoError>;

    /// Atomically debits `amount` if the balance stays strictly positive.
    ///
    /// Returns the committed account. When nothing was updated, yields
    /// `RepoError::NotFound` if the card is absent, otherwise
    /// `DomainError::InsufficientFunds`.
    async fn debit_by_card(&self, card: &CardNumber, amount: Money) -> Result<Account, RepoError>;
}
