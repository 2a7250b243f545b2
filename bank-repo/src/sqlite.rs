//! SQLite account store adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use bank_types::{Account, AccountId, AccountStore, CardNumber, Money, NewAccount, RepoError};

use crate::types::{ACCOUNT_COLUMNS, DbAccount, DbBalance, map_db_error, rejected_debit, single_row};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Store
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite account store over a connection pool.
pub struct SqliteStore {
    pool: SqlitePool,
}

/// Pool settings for a database URL.
///
/// An in-memory database lives and dies with its only connection, so that
/// connection is never reaped.
pub(crate) fn pool_options(in_memory: bool, max_connections: u32) -> SqlitePoolOptions {
    if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    }
}

impl SqliteStore {
    /// Creates a new SQLite store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::connect(database_url, crate::DEFAULT_MAX_CONNECTIONS).await
    }

    /// Connects with an explicit pool size and runs migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists.
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = pool_options(in_memory, max_connections)
            .connect_with(options)
            .await?;

        let store = Self::with_pool(pool);
        store.create_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool without touching the schema.
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_accounts.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AccountStore for SqliteStore {
    async fn find_by_card_number(&self, card: &CardNumber) -> Result<Option<Account>, RepoError> {
        let rows: Vec<DbAccount> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE card_number = ? LIMIT 2"
        ))
        .bind(card.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        single_row(rows, &card.masked())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepoError> {
        let row: Option<DbAccount> =
            sqlx::query_as(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        row.map(DbAccount::into_domain).transpose()
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, RepoError> {
        let rows: Vec<DbAccount> =
            sqlx::query_as(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        rows.into_iter().map(DbAccount::into_domain).collect()
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, RepoError> {
        let result = sqlx::query(
            r#"INSERT INTO accounts (name, balance, card_number, is_card_active) VALUES (?, ?, ?, ?)"#,
        )
        .bind(&account.name)
        .bind(account.balance.amount())
        .bind(account.card_number.as_str())
        .bind(account.is_card_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Account::from_parts(
            AccountId::new(result.last_insert_rowid()),
            account,
        ))
    }

    async fn update_account(&self, account: &Account) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE accounts SET name = ?, balance = ?, card_number = ?, is_card_active = ? WHERE id = ?"#,
        )
        .bind(&account.name)
        .bind(account.balance.amount())
        .bind(account.card_number.as_str())
        .bind(account.is_card_active)
        .bind(account.id.get())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM accounts WHERE id = ?"#)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn debit_by_card(&self, card: &CardNumber, amount: Money) -> Result<Account, RepoError> {
        // SQLite serializes writers, so the guarded UPDATE is the whole critical section.
        let row: Option<DbAccount> = sqlx::query_as(&format!(
            "UPDATE accounts SET balance = balance - ? \
             WHERE card_number = ? AND balance - ? > 0 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(amount.amount())
        .bind(card.as_str())
        .bind(amount.amount())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        if let Some(row) = row {
            return row.into_domain();
        }

        let current: Option<DbBalance> =
            sqlx::query_as(r#"SELECT balance FROM accounts WHERE card_number = ?"#)
                .bind(card.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        Err(rejected_debit(current, amount))
    }
}
