//! Ledger Engine
//!
//! Executes card payments: resolve the account, check solvency, debit,
//! persist, and report a [`TransactionOutcome`]. Every protocol adapter
//! goes through [`LedgerEngine::execute_payment`].

use std::sync::Arc;

use bank_types::domain::mask_card;
use bank_types::{
    Account, AccountStore, CardNumber, DomainError, FailureReason, Money, PaymentRequest,
    RepoError, TransactionId, TransactionOutcome,
};

/// Payment core, generic over the account store.
///
/// Holds no per-account state; each call works on its own copy of the
/// account and the store serializes the final compare-and-decrement.
pub struct LedgerEngine<S: AccountStore> {
    store: Arc<S>,
}

impl<S: AccountStore> LedgerEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Runs one payment to a terminal outcome.
    ///
    /// The transaction id is issued before any validation and returned on
    /// both the success and the failure path. Nothing is retried.
    #[tracing::instrument(
        skip(self, req),
        fields(
            transaction_id = tracing::field::Empty,
            card = %mask_card(&req.card_number),
            amount = req.amount
        )
    )]
    pub async fn execute_payment(&self, req: PaymentRequest) -> TransactionOutcome {
        let transaction_id = TransactionId::new();
        tracing::Span::current().record("transaction_id", tracing::field::display(transaction_id));

        match self.debit(&req).await {
            Ok(account) => {
                tracing::info!(
                    account_id = %account.id,
                    balance = account.balance.amount(),
                    "payment committed"
                );
                TransactionOutcome::success(transaction_id)
            }
            Err(reason) => {
                tracing::warn!(reason = %reason, "payment rejected");
                TransactionOutcome::failure(transaction_id, reason)
            }
        }
    }

    /// Issues a failed outcome for a payment body that could not be decoded,
    /// such as a fractional or missing amount.
    pub fn reject_malformed(&self, detail: &str) -> TransactionOutcome {
        let transaction_id = TransactionId::new();
        tracing::warn!(%transaction_id, detail, "malformed payment request rejected");
        TransactionOutcome::failure(transaction_id, FailureReason::InvalidAmount)
    }

    async fn debit(&self, req: &PaymentRequest) -> Result<Account, FailureReason> {
        // Rejected before touching the store.
        if req.amount <= 0 {
            return Err(FailureReason::InvalidAmount);
        }
        let amount = Money::new(req.amount).map_err(|_| FailureReason::InvalidAmount)?;

        // A malformed card cannot match any row.
        let card = CardNumber::parse(&req.card_number).map_err(|e| {
            tracing::debug!(error = %e, "unparsable card number");
            FailureReason::NoAccountFound
        })?;

        // Resolve
        let mut account = match self.store.find_by_card_number(&card).await {
            Ok(Some(account)) => account,
            Ok(None) => return Err(FailureReason::NoAccountFound),
            Err(e) => {
                tracing::error!(error = %e, "account lookup failed");
                return Err(FailureReason::Internal);
            }
        };

        // Authorize and apply on the local copy
        account.debit(amount).map_err(|e| match e {
            DomainError::InsufficientFunds { .. } => FailureReason::InsufficientFunds,
            other => {
                tracing::error!(error = %other, "unexpected domain error");
                FailureReason::Internal
            }
        })?;

        // Persist; the store re-checks solvency against the committed balance.
        match self.store.debit_by_card(&card, amount).await {
            Ok(committed) => Ok(committed),
            Err(RepoError::Domain(DomainError::InsufficientFunds { available, .. })) => {
                tracing::info!(available, "balance changed concurrently, debit refused");
                Err(FailureReason::InsufficientFunds)
            }
            Err(RepoError::NotFound) => {
                tracing::error!(account_id = %account.id, "account vanished before the debit was persisted");
                Err(FailureReason::Internal)
            }
            Err(e) => {
                tracing::error!(error = %e, "persisting debit failed");
                Err(FailureReason::Internal)
            }
        }
    }
}
