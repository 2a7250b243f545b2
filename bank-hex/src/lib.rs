//! # Bank Hex
//!
//! Application layer and inbound adapters for the ledger service.
//!
//! ## Architecture
//!
//! - `ledger/` - Ledger engine (payment execution, the only balance mutator)
//! - `service/` - Account CRUD service
//! - `inbound/` - HTTP adapter (Axum) and gRPC adapter (Tonic)
//!
//! Everything is generic over `S: AccountStore`, allowing different store
//! implementations to be injected.

pub mod inbound;
pub mod ledger;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use ledger::LedgerEngine;
pub use service::AccountService;
