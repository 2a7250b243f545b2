//! gRPC payment adapter.
//!
//! Translates `operations.Operations/ExecutePayment` calls into a single
//! ledger call. Failures travel in the response body, not as a `Status`,
//! so the caller always receives the transaction id.

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::{Request, Response, Status, transport::Server};

use bank_types::{AccountStore, PaymentRequest, TransactionOutcome};

use crate::LedgerEngine;

pub mod operations {
    tonic::include_proto!("operations");
}

use operations::{
    PaymentReq, PaymentResp,
    operations_server::{Operations, OperationsServer},
};

impl From<PaymentReq> for PaymentRequest {
    fn from(req: PaymentReq) -> Self {
        PaymentRequest {
            card_number: req.card_number,
            amount: req.amount,
        }
    }
}

impl From<TransactionOutcome> for PaymentResp {
    fn from(outcome: TransactionOutcome) -> Self {
        PaymentResp {
            success: outcome.success,
            transaction_id: outcome.transaction_id.to_string(),
            error: outcome
                .failure
                .map(|reason| reason.code().to_string())
                .unwrap_or_default(),
        }
    }
}

/// `Operations` service implementation backed by the ledger engine.
pub struct PaymentGrpcService<S: AccountStore> {
    ledger: Arc<LedgerEngine<S>>,
}

impl<S: AccountStore> PaymentGrpcService<S> {
    pub fn new(ledger: Arc<LedgerEngine<S>>) -> Self {
        Self { ledger }
    }
}

#[tonic::async_trait]
impl<S: AccountStore> Operations for PaymentGrpcService<S> {
    async fn execute_payment(
        &self,
        request: Request<PaymentReq>,
    ) -> Result<Response<PaymentResp>, Status> {
        let outcome = self.ledger.execute_payment(request.into_inner().into()).await;
        Ok(Response::new(outcome.into()))
    }
}

/// gRPC server for payments.
pub struct GrpcServer<S: AccountStore> {
    service: PaymentGrpcService<S>,
}

impl<S: AccountStore> GrpcServer<S> {
    pub fn new(ledger: Arc<LedgerEngine<S>>) -> Self {
        Self {
            service: PaymentGrpcService::new(ledger),
        }
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let addr: SocketAddr = addr.parse()?;
        tracing::info!("gRPC server listening on {}", addr);

        Server::builder()
            .trace_fn(|_| tracing::info_span!("grpc_request"))
            .add_service(OperationsServer::new(self.service))
            .serve_with_shutdown(addr, super::shutdown_signal())
            .await?;

        Ok(())
    }
}
