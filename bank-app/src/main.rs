//! # Bank Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the account store
//! - Create the ledger engine
//! - Start the HTTP and gRPC servers

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bank_hex::{
    LedgerEngine,
    inbound::{GrpcServer, HttpServer},
};
use bank_repo::build_store;

/// Builds an OTLP tracer when a collector endpoint is configured.
fn init_tracer() -> anyhow::Result<Option<(sdktrace::Tracer, sdktrace::SdkTracerProvider)>> {
    if std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_none() {
        return Ok(None);
    }

    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok(Some((provider.tracer("bank-ledger"), provider)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let otel = init_tracer()?;
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bank_app=debug,bank_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!(
        http_port = config.http_port,
        grpc_port = config.grpc_port,
        "Starting bank ledger service"
    );

    // Build store (handles connection pool and migration)
    let store = Arc::new(build_store(&config.database_url, config.max_connections).await?);

    // One engine shared by every protocol adapter
    let ledger = Arc::new(LedgerEngine::new(Arc::clone(&store)));

    let http = HttpServer::new(store, Arc::clone(&ledger));
    let grpc = GrpcServer::new(ledger);

    let (http_addr, grpc_addr) = (config.http_addr(), config.grpc_addr());
    tokio::try_join!(http.run(&http_addr), grpc.run(&grpc_addr))?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
