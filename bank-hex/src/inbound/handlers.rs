//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use bank_types::{
    AccountId, AccountRequest, AccountStore, AppError, DeletionResponse, FailureReason,
    PaymentRequest,
};

use crate::{AccountService, LedgerEngine};

/// Application state shared across handlers.
pub struct AppState<S: AccountStore> {
    pub accounts: AccountService<S>,
    pub ledger: Arc<LedgerEngine<S>>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::BadRequest(rejection.body_text()))
    }
}

fn parse_account_id(raw: &str) -> Result<AccountId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Cannot parse account id".into()))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// List all accounts.
#[tracing::instrument(skip(state))]
pub async fn list_accounts<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.accounts.list_accounts().await?;
    Ok(Json(accounts))
}

/// Get account by ID.
#[tracing::instrument(skip(state), fields(account_id = %id))]
pub async fn get_account<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let account = state.accounts.get_account(account_id).await?;
    Ok(Json(account))
}

/// Create an account.
#[tracing::instrument(skip(state, payload))]
pub async fn create_account<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let account = state.accounts.create_account(req).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Replace an account's fields.
#[tracing::instrument(skip(state, payload), fields(account_id = %id))]
pub async fn update_account<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let Json(req) = payload?;
    let account = state.accounts.update_account(account_id, req).await?;
    Ok(Json(account))
}

/// Delete an account.
#[tracing::instrument(skip(state), fields(account_id = %id))]
pub async fn delete_account<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    state.accounts.delete_account(account_id).await?;
    Ok(Json(DeletionResponse {
        result: "successful deletion".into(),
    }))
}

/// Execute a card payment. The body is the outcome whatever the status,
/// including bodies that fail to decode.
#[tracing::instrument(skip(state, payload))]
pub async fn execute_payment<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let outcome = match payload {
        Ok(Json(req)) => state.ledger.execute_payment(req).await,
        Err(rejection) => state.ledger.reject_malformed(&rejection.body_text()),
    };

    let status = match outcome.failure {
        None => StatusCode::OK,
        Some(FailureReason::InvalidAmount) => StatusCode::BAD_REQUEST,
        Some(FailureReason::NoAccountFound) => StatusCode::NOT_FOUND,
        Some(FailureReason::InsufficientFunds) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(FailureReason::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(outcome))
}
