//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use bank_types::{
    Account, AccountRequest, DeletionResponse, FailureReason, PaymentRequest, TransactionOutcome,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List all accounts
#[utoipa::path(
    get,
    path = "/account",
    tag = "accounts",
    responses(
        (status = 200, description = "List of accounts", body = Vec<Account>)
    )
)]
async fn list_accounts() {}

/// Get account by ID
#[utoipa::path(
    get,
    path = "/account/{id}",
    tag = "accounts",
    params(
        ("id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 400, description = "Unparsable account ID"),
        (status = 404, description = "Account not found")
    )
)]
async fn get_account() {}

/// Create a new account
#[utoipa::path(
    post,
    path = "/account",
    tag = "accounts",
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = Account),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Card number already registered")
    )
)]
async fn create_account() {}

/// Replace all fields of an account
#[utoipa::path(
    put,
    path = "/account/{id}",
    tag = "accounts",
    request_body = AccountRequest,
    params(
        ("id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Card number already registered")
    )
)]
async fn update_account() {}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/account/{id}",
    tag = "accounts",
    params(
        ("id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account deleted", body = DeletionResponse),
        (status = 404, description = "Account not found")
    )
)]
async fn delete_account() {}

/// Debit an account by card number
#[utoipa::path(
    post,
    path = "/payment",
    tag = "payments",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Payment committed", body = TransactionOutcome),
        (status = 400, description = "Amount is not positive", body = TransactionOutcome),
        (status = 404, description = "No account for this card", body = TransactionOutcome),
        (status = 422, description = "Insufficient funds", body = TransactionOutcome),
        (status = 500, description = "Internal error", body = TransactionOutcome)
    )
)]
async fn execute_payment() {}

/// OpenAPI documentation for the account ledger API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bank Ledger Service API",
        version = "1.0.0",
        description = "Account management and card payments. Amounts are integers in minor units (cents).\n\nPayments are also served over gRPC (`operations.Operations/ExecutePayment`).",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_accounts,
        get_account,
        create_account,
        update_account,
        delete_account,
        execute_payment,
    ),
    components(
        schemas(
            Account,
            AccountRequest,
            DeletionResponse,
            PaymentRequest,
            TransactionOutcome,
            FailureReason,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Account management operations"),
        (name = "payments", description = "Card payment execution"),
    )
)]
pub struct ApiDoc;
