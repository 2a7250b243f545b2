//! PostgreSQL account store adapter.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use bank_types::{Account, AccountId, AccountStore, CardNumber, Money, NewAccount, RepoError};

use crate::types::{ACCOUNT_COLUMNS, DbAccount, DbBalance, map_db_error, rejected_debit, single_row};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Store
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL account store. Debits rely on the row lock taken by `UPDATE`.
pub struct PostgresStore {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_accounts_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresStore {
    /// Creates a new PostgreSQL store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::connect(database_url, crate::DEFAULT_MAX_CONNECTIONS).await
    }

    /// Connects with an explicit pool size and runs migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;
        run_migrations(&pool).await?;
        Ok(Self::with_pool(pool))
    }

    /// Wraps an existing pool without touching the schema.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn find_by_card_number(&self, card: &CardNumber) -> Result<Option<Account>, RepoError> {
        let rows: Vec<DbAccount> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE card_number = $1 LIMIT 2"
        ))
        .bind(card.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        single_row(rows, &card.masked())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepoError> {
        let row: Option<DbAccount> =
            sqlx::query_as(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
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
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO accounts (name, balance, card_number, is_card_active)
               VALUES ($1, $2, $3, $4) RETURNING id"#,
        )
        .bind(&account.name)
        .bind(account.balance.amount())
        .bind(account.card_number.as_str())
        .bind(account.is_card_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Account::from_parts(AccountId::new(id), account))
    }

    async fn update_account(&self, account: &Account) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE accounts SET name = $1, balance = $2, card_number = $3, is_card_active = $4
               WHERE id = $5"#,
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
        let result = sqlx::query(r#"DELETE FROM accounts WHERE id = $1"#)
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
        // Under READ COMMITTED a blocked UPDATE re-evaluates the guard against
        // the committed row, so concurrent debits cannot both pass it.
        let row: Option<DbAccount> = sqlx::query_as(&format!(
            "UPDATE accounts SET balance = balance - $1 \
             WHERE card_number = $2 AND balance - $1 > 0 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(amount.amount())
        .bind(card.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        if let Some(row) = row {
            return row.into_domain();
        }

        let current: Option<DbBalance> =
            sqlx::query_as(r#"SELECT balance FROM accounts WHERE card_number = $1"#)
                .bind(card.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        Err(rejected_debit(current, amount))
    }
}
