//! SQLite store integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bank_types::{
        Account, AccountId, AccountStore, CardNumber, DomainError, Money, NewAccount, RepoError,
    };

    use crate::SqliteStore;

    async fn setup_store() -> SqliteStore {
        SqliteStore::new("sqlite::memory:").await.unwrap()
    }

    fn new_account(name: &str, balance: i64, card: &str) -> NewAccount {
        NewAccount::new(name.to_string(), balance, card, true).unwrap()
    }

    fn card(raw: &str) -> CardNumber {
        CardNumber::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_create_account_assigns_id() {
        let store = setup_store().await;

        let first = store
            .create_account(new_account("Alice", 100, "4111"))
            .await
            .unwrap();
        let second = store
            .create_account(new_account("Bob", 0, "5500"))
            .await
            .unwrap();

        assert_eq!(first.name, "Alice");
        assert_eq!(first.balance.amount(), 100);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_duplicate_card_is_conflict() {
        let store = setup_store().await;
        store
            .create_account(new_account("Alice", 100, "4111"))
            .await
            .unwrap();

        let result = store.create_account(new_account("Mallory", 5, "4111")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_find_by_id_and_card() {
        let store = setup_store().await;
        let created = store
            .create_account(new_account("Alice", 100, "4111"))
            .await
            .unwrap();

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        let by_card = store.find_by_card_number(&card("4111")).await.unwrap().unwrap();

        assert_eq!(by_id, created);
        assert_eq!(by_card, created);
    }

    #[tokio::test]
    async fn test_lookups_not_found() {
        let store = setup_store().await;

        assert!(store.find_by_id(AccountId::new(42)).await.unwrap().is_none());
        assert!(
            store
                .find_by_card_number(&card("0000"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_card_lookup_is_not_interpolated() {
        let store = setup_store().await;
        store
            .create_account(new_account("Alice", 100, "4111"))
            .await
            .unwrap();

        // Only digits can form a CardNumber; query the raw column through the
        // pool to prove a quoted payload is treated as a value.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE card_number = ?")
            .bind("4111' OR '1'='1")
            .fetch_one(store.pool())
            .await
            .unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_list_accounts_ordered_by_id() {
        let store = setup_store().await;
        store
            .create_account(new_account("Alice", 100, "4111"))
            .await
            .unwrap();
        store
            .create_account(new_account("Bob", 50, "5500"))
            .await
            .unwrap();

        let accounts = store.list_accounts().await.unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].name, "Alice");
        assert_eq!(accounts[1].name, "Bob");
    }

    #[tokio::test]
    async fn test_update_account_replaces_fields() {
        let store = setup_store().await;
        let created = store
            .create_account(new_account("Alice", 100, "4111"))
            .await
            .unwrap();

        let replacement = Account::from_parts(
            created.id,
            NewAccount::new("Alice Smith".to_string(), 250, "4222", false).unwrap(),
        );
        store.update_account(&replacement).await.unwrap();

        let fetched = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, replacement);
        assert!(
            store
                .find_by_card_number(&card("4111"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = setup_store().await;
        let ghost = Account::from_parts(AccountId::new(99), new_account("Ghost", 1, "9999"));

        let result = store.update_account(&ghost).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_account() {
        let store = setup_store().await;
        let created = store
            .create_account(new_account("Alice", 100, "4111"))
            .await
            .unwrap();

        store.delete_account(created.id).await.unwrap();

        assert!(store.find_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_account(created.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_debit_by_card() {
        let store = setup_store().await;
        store
            .create_account(new_account("Alice", 100, "4111"))
            .await
            .unwrap();

        let updated = store
            .debit_by_card(&card("4111"), Money::new(40).unwrap())
            .await
            .unwrap();

        assert_eq!(updated.balance.amount(), 60);
        let fetched = store.find_by_card_number(&card("4111")).await.unwrap().unwrap();
        assert_eq!(fetched.balance.amount(), 60);
    }

    #[tokio::test]
    async fn test_debit_exact_balance_is_rejected() {
        let store = setup_store().await;
        store
            .create_account(new_account("Alice", 60, "4111"))
            .await
            .unwrap();

        let result = store
            .debit_by_card(&card("4111"), Money::new(60).unwrap())
            .await;

        assert!(matches!(
            result,
            Err(RepoError::Domain(DomainError::InsufficientFunds {
                available: 60,
                requested: 60
            }))
        ));
        let fetched = store.find_by_card_number(&card("4111")).await.unwrap().unwrap();
        assert_eq!(fetched.balance.amount(), 60);
    }

    #[tokio::test]
    async fn test_debit_unknown_card_is_not_found() {
        let store = setup_store().await;

        let result = store
            .debit_by_card(&card("0000"), Money::new(1).unwrap())
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[test]
    fn test_in_memory_pool_never_reaps_its_connection() {
        let options = crate::sqlite::pool_options(true, 10);
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);

        let options = crate::sqlite::pool_options(false, 8);
        assert_eq!(options.get_max_connections(), 8);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_debits_never_overdraw() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("ledger.db").display());
        let store = Arc::new(SqliteStore::connect(&url, 8).await.unwrap());
        store
            .create_account(new_account("Alice", 105, "4111"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .debit_by_card(&card("4111"), Money::new(10).unwrap())
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(account) => {
                    assert!(account.balance.amount() > 0);
                    successes += 1;
                }
                Err(RepoError::Domain(DomainError::InsufficientFunds { .. })) => {}
                Err(other) => panic!("unexpected store error: {other}"),
            }
        }

        assert_eq!(successes, 10);
        let fetched = store.find_by_card_number(&card("4111")).await.unwrap().unwrap();
        assert_eq!(fetched.balance.amount(), 5);
    }
}
