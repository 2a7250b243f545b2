//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bank_types::AccountStore;

use super::handlers::{self, AppState};
use crate::openapi::ApiDoc;
use crate::{AccountService, LedgerEngine};

/// HTTP Server for the account and payment API.
pub struct HttpServer<S: AccountStore> {
    state: Arc<AppState<S>>,
}

impl<S: AccountStore> HttpServer<S> {
    /// Creates a new HTTP server over the shared store and ledger.
    pub fn new(store: Arc<S>, ledger: Arc<LedgerEngine<S>>) -> Self {
        Self {
            state: Arc::new(AppState {
                accounts: AccountService::new(store),
                ledger,
            }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/account",
                get(handlers::list_accounts::<S>).post(handlers::create_account::<S>),
            )
            .route(
                "/account/{id}",
                get(handlers::get_account::<S>)
                    .put(handlers::update_account::<S>)
                    .delete(handlers::delete_account::<S>),
            )
            .route("/payment", post(handlers::execute_payment::<S>))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
