//! AccountService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use bank_types::{
        Account, AccountId, AccountRequest, AccountStore, AppError, CardNumber, DomainError,
        Money, NewAccount, RepoError,
    };

    use crate::AccountService;

    /// Simple in-memory store for testing the application layer.
    pub struct MockStore {
        accounts: Mutex<BTreeMap<AccountId, Account>>,
        next_id: AtomicUsize,
        /// Number of calls that reached the store.
        pub calls: AtomicUsize,
        /// Makes lookups fail with a database error.
        pub fail_lookups: AtomicBool,
        /// Makes debits fail with a database error.
        pub fail_debits: AtomicBool,
        /// Deletes the target row right before a debit runs.
        pub vanish_before_debit: AtomicBool,
        /// Overwrites the balance right before a debit runs.
        pub balance_before_debit: Mutex<Option<i64>>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self {
                accounts: Mutex::new(BTreeMap::new()),
                next_id: AtomicUsize::new(1),
                calls: AtomicUsize::new(0),
                fail_lookups: AtomicBool::new(false),
                fail_debits: AtomicBool::new(false),
                vanish_before_debit: AtomicBool::new(false),
                balance_before_debit: Mutex::new(None),
            }
        }

        /// Inserts an account directly, bypassing the call counter.
        pub fn seed(&self, name: &str, balance: i64, card: &str) -> Account {
            let id = AccountId::new(self.next_id.fetch_add(1, Ordering::SeqCst) as i64);
            let account = Account::from_parts(
                id,
                NewAccount::new(name.to_string(), balance, card, true).unwrap(),
            );
            self.accounts.lock().unwrap().insert(id, account.clone());
            account
        }

        pub fn balance_of(&self, card: &str) -> Option<i64> {
            self.accounts
                .lock()
                .unwrap()
                .values()
                .find(|a| a.card_number.as_str() == card)
                .map(|a| a.balance.amount())
        }

        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl AccountStore for MockStore {
        async fn find_by_card_number(
            &self,
            card: &CardNumber,
        ) -> Result<Option<Account>, RepoError> {
            self.touch();
            if self.fail_lookups.load(Ordering::SeqCst) {
                return Err(RepoError::Database("connection refused".into()));
            }
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .values()
                .find(|a| &a.card_number == card)
                .cloned())
        }

        async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepoError> {
            self.touch();
            Ok(self.accounts.lock().unwrap().get(&id).cloned())
        }

        async fn list_accounts(&self) -> Result<Vec<Account>, RepoError> {
            self.touch();
            Ok(self.accounts.lock().unwrap().values().cloned().collect())
        }

        async fn create_account(&self, account: NewAccount) -> Result<Account, RepoError> {
            self.touch();
            let mut accounts = self.accounts.lock().unwrap();
            if accounts
                .values()
                .any(|a| a.card_number == account.card_number)
            {
                return Err(RepoError::Conflict("card number already registered".into()));
            }
            let id = AccountId::new(self.next_id.fetch_add(1, Ordering::SeqCst) as i64);
            let account = Account::from_parts(id, account);
            accounts.insert(id, account.clone());
            Ok(account)
        }

        async fn update_account(&self, account: &Account) -> Result<(), RepoError> {
            self.touch();
            let mut accounts = self.accounts.lock().unwrap();
            if accounts
                .values()
                .any(|a| a.id != account.id && a.card_number == account.card_number)
            {
                return Err(RepoError::Conflict("card number already registered".into()));
            }
            let slot = accounts.get_mut(&account.id).ok_or(RepoError::NotFound)?;
            *slot = account.clone();
            Ok(())
        }

        async fn delete_account(&self, id: AccountId) -> Result<(), RepoError> {
            self.touch();
            self.accounts
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(RepoError::NotFound)
        }

        async fn debit_by_card(
            &self,
            card: &CardNumber,
            amount: Money,
        ) -> Result<Account, RepoError> {
            self.touch();
            if self.fail_debits.load(Ordering::SeqCst) {
                return Err(RepoError::Database("disk I/O error".into()));
            }
            let mut accounts = self.accounts.lock().unwrap();
            if self.vanish_before_debit.load(Ordering::SeqCst) {
                accounts.retain(|_, a| &a.card_number != card);
            }
            let account = accounts
                .values_mut()
                .find(|a| &a.card_number == card)
                .ok_or(RepoError::NotFound)?;
            if let Some(balance) = self.balance_before_debit.lock().unwrap().take() {
                account.balance = Money::new(balance).unwrap();
            }
            if account.balance.amount() - amount.amount() <= 0 {
                return Err(RepoError::Domain(DomainError::InsufficientFunds {
                    available: account.balance.amount(),
                    requested: amount.amount(),
                }));
            }
            account.balance = account.balance.checked_sub(amount)?;
            Ok(account.clone())
        }
    }

    fn request(name: &str, balance: i64, card: &str) -> AccountRequest {
        AccountRequest {
            name: name.to_string(),
            balance,
            card_number: card.to_string(),
            is_card_active: true,
        }
    }

    fn service() -> AccountService<MockStore> {
        AccountService::new(std::sync::Arc::new(MockStore::new()))
    }

    #[tokio::test]
    async fn test_create_account_success() {
        let service = service();

        let account = service
            .create_account(request("Alice", 100, "4111"))
            .await
            .unwrap();

        assert_eq!(account.name, "Alice");
        assert_eq!(account.balance.amount(), 100);
        assert_eq!(account.card_number.as_str(), "4111");
    }

    #[tokio::test]
    async fn test_create_account_validation_never_reaches_store() {
        let service = service();

        let empty_name = service.create_account(request("", 100, "4111")).await;
        let negative = service.create_account(request("Alice", -1, "4111")).await;
        let bad_card = service.create_account(request("Alice", 1, "41-11")).await;

        assert!(matches!(empty_name, Err(AppError::BadRequest(_))));
        assert!(matches!(negative, Err(AppError::BadRequest(_))));
        assert!(matches!(bad_card, Err(AppError::BadRequest(_))));
        assert_eq!(service.store().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_card_is_conflict() {
        let service = service();
        service
            .create_account(request("Alice", 100, "4111"))
            .await
            .unwrap();

        let result = service.create_account(request("Eve", 1, "4111")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let service = service();

        let result = service.get_account(AccountId::new(7)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let service = service();
        service
            .create_account(request("Alice", 100, "4111"))
            .await
            .unwrap();
        service
            .create_account(request("Bob", 50, "5500"))
            .await
            .unwrap();

        let accounts = service.list_accounts().await.unwrap();

        assert_eq!(accounts.len(), 2);
    }

    #[tokio::test]
    async fn test_update_account_replaces_fields() {
        let service = service();
        let created = service
            .create_account(request("Alice", 100, "4111"))
            .await
            .unwrap();

        let mut replacement = request("Alice Smith", 250, "4222");
        replacement.is_card_active = false;
        let updated = service
            .update_account(created.id, replacement)
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        let fetched = service.get_account(created.id).await.unwrap();
        assert_eq!(fetched.name, "Alice Smith");
        assert_eq!(fetched.balance.amount(), 250);
        assert_eq!(fetched.card_number.as_str(), "4222");
        assert!(!fetched.is_card_active);
    }

    #[tokio::test]
    async fn test_update_missing_account_is_not_found() {
        let service = service();

        let result = service
            .update_account(AccountId::new(3), request("Ghost", 1, "9999"))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_account() {
        let service = service();
        let created = service
            .create_account(request("Alice", 100, "4111"))
            .await
            .unwrap();

        service.delete_account(created.id).await.unwrap();

        assert!(matches!(
            service.get_account(created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_account(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
