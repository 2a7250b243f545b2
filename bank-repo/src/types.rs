//! Database row types shared by the SQLite and PostgreSQL adapters.

use sqlx::FromRow;

use bank_types::{Account, AccountId, CardNumber, Money, NewAccount, RepoError};

/// Column list matching [`DbAccount`], in declaration order.
pub const ACCOUNT_COLUMNS: &str = "id, name, balance, card_number, is_card_active";

/// Account row from database.
#[derive(FromRow)]
pub struct DbAccount {
    pub id: i64,
    pub name: String,
    pub balance: i64,
    pub card_number: String,
    pub is_card_active: bool,
}

/// Balance-only row for queries.
#[derive(FromRow)]
pub struct DbBalance {
    pub balance: i64,
}

impl DbAccount {
    /// Convert database row to domain Account.
    pub fn into_domain(self) -> Result<Account, RepoError> {
        let balance = Money::new(self.balance).map_err(|e| {
            RepoError::Integrity(format!("account {} has balance {}: {}", self.id, self.balance, e))
        })?;
        let card_number = CardNumber::parse(&self.card_number)
            .map_err(|e| RepoError::Integrity(format!("account {}: {}", self.id, e)))?;

        Ok(Account::from_parts(
            AccountId::new(self.id),
            NewAccount {
                name: self.name,
                balance,
                card_number,
                is_card_active: self.is_card_active,
            },
        ))
    }
}

/// Maps a driver error, surfacing unique-key violations as conflicts.
pub fn map_db_error(err: sqlx::Error) -> RepoError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return RepoError::Conflict("card number already registered".into());
        }
        if db_err.is_check_violation() {
            return RepoError::Integrity(db_err.message().to_string());
        }
    }
    RepoError::Database(err.to_string())
}

/// Applies the "at most one row" rule for unique-key lookups.
pub fn single_row(rows: Vec<DbAccount>, key: &str) -> Result<Option<Account>, RepoError> {
    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (None, _) => Ok(None),
        (Some(row), None) => row.into_domain().map(Some),
        (Some(_), Some(_)) => Err(RepoError::Integrity(format!(
            "more than one account matches {}",
            key
        ))),
    }
}

/// Classifies a conditional debit that touched no row.
pub fn rejected_debit(current: Option<DbBalance>, amount: Money) -> RepoError {
    match current {
        None => RepoError::NotFound,
        Some(row) => RepoError::Domain(bank_types::DomainError::InsufficientFunds {
            available: row.balance,
            requested: amount.amount(),
        }),
    }
}
