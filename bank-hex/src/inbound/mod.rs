//! Inbound Adapters
//!
//! Axum-based HTTP server and Tonic-based gRPC server, both driving the
//! same application layer.

pub mod grpc;
mod handlers;
mod server;

pub use grpc::GrpcServer;
pub use handlers::AppState;
pub use server::{HttpServer, shutdown_signal};
