//! Account Application Service
//!
//! Plain CRUD over the store port. Balances set here are validated but
//! payments never pass through this service.

use std::sync::Arc;

use bank_types::{Account, AccountId, AccountRequest, AccountStore, AppError, NewAccount};

/// Application service for account management.
///
/// Generic over `S: AccountStore` - the adapter is injected at compile time.
pub struct AccountService<S: AccountStore> {
    store: Arc<S>,
}

impl<S: AccountStore> AccountService<S> {
    /// Creates a new account service over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists all accounts.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.store.list_accounts().await.map_err(Into::into)
    }

    /// Gets an account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Account {}", id))))
    }

    /// Creates a new account.
    pub async fn create_account(&self, req: AccountRequest) -> Result<Account, AppError> {
        let fields: NewAccount = req.try_into()?;
        let account = self.store.create_account(fields).await?;
        tracing::info!(account_id = %account.id, card = %account.card_number.masked(), "account created");
        Ok(account)
    }

    /// Replaces every mutable field of an existing account.
    pub async fn update_account(
        &self,
        id: AccountId,
        req: AccountRequest,
    ) -> Result<Account, AppError> {
        let fields: NewAccount = req.try_into()?;
        let account = Account::from_parts(id, fields);

        self.store.update_account(&account).await.map_err(|e| match e {
            bank_types::RepoError::NotFound => AppError::NotFound(format!("Account {}", id)),
            other => other.into(),
        })?;

        Ok(account)
    }

    /// Deletes an account.
    pub async fn delete_account(&self, id: AccountId) -> Result<(), AppError> {
        self.store.delete_account(id).await.map_err(|e| match e {
            bank_types::RepoError::NotFound => AppError::NotFound(format!("Account {}", id)),
            other => other.into(),
        })
    }
}
