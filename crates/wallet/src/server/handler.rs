//! JSON-RPC over HTTP.
//!
//! Calls of a batch run concurrently, so a gated call waiting for authorization does not hold up
//! the rest of its batch.

use crate::wallet::HeadlessWallet;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use futures::{FutureExt, future};
use headless_rpc::{
    error::RpcError,
    request::{Request, RpcCall},
    response::{Response, RpcResponse},
};
use tracing::{trace, warn};

/// Handles incoming JSON-RPC Request
pub async fn handle(
    State(wallet): State<HeadlessWallet>,
    request: Result<Json<Request>, JsonRejection>,
) -> Json<Response> {
    match request {
        Err(err) => {
            warn!(target: "wallet::server", "invalid request={:?}", err);
            Response::error(RpcError::invalid_request()).into()
        }
        Ok(req) => handle_request(req.0, wallet)
            .await
            .unwrap_or_else(|| Response::error(RpcError::invalid_request()))
            .into(),
    }
}

/// Handle the JSON-RPC [Request]
///
/// Batch calls run concurrently, so an unsafe call waiting for an authorization does not hold up
/// the other calls of its batch.
pub async fn handle_request(req: Request, wallet: HeadlessWallet) -> Option<Response> {
    /// processes batch calls
    fn responses_as_batch(outs: Vec<Option<RpcResponse>>) -> Option<Response> {
        let batch: Vec<_> = outs.into_iter().flatten().collect();
        (!batch.is_empty()).then_some(Response::Batch(batch))
    }

    match req {
        Request::Single(call) => handle_call(call, wallet).await.map(Response::Single),
        Request::Batch(calls) => {
            future::join_all(calls.into_iter().map(move |call| handle_call(call, wallet.clone())))
                .map(responses_as_batch)
                .await
        }
    }
}

/// handle a single RPC method call
async fn handle_call(call: RpcCall, wallet: HeadlessWallet) -> Option<RpcResponse> {
    match call {
        RpcCall::MethodCall(call) => {
            trace!(target: "wallet::server", "handling call {:?}", call);
            Some(wallet.handle(call).await)
        }
        RpcCall::Notification(notification) => {
            trace!(target: "wallet::server", "received rpc notification method={}", notification.method);
            None
        }
        RpcCall::Invalid { id } => {
            trace!(target: "wallet::server", "invalid rpc call id={}", id);
            Some(RpcResponse::invalid_request(id))
        }
    }
}
