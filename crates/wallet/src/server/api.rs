//! Control endpoints for driving the wallet from a test runner.

use crate::{chain::Chain, queue::RequestInfo, wallet::HeadlessWallet};
use alloy_primitives::{Address, ChainId};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use headless_rpc::error::RpcError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The envelope of every control endpoint response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Ok(T),
    Error { message: String },
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl ToString) -> Self {
        Self::Error { message: message.to_string() }
    }
}

impl<T, E: ToString> From<Result<T, E>> for ApiResponse<T> {
    fn from(res: Result<T, E>) -> Self {
        match res {
            Ok(data) => Self::Ok(data),
            Err(err) => Self::error(err),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MethodFilter {
    pub method: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending {
    pub count: usize,
    pub requests: Vec<RequestInfo>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Authorize {
    pub method: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reject {
    pub method: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RejectAll {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchNetwork {
    #[serde(with = "crate::serde_helpers::chain_id")]
    pub chain_id: ChainId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAccounts {
    pub private_keys: Vec<String>,
}

pub fn router() -> Router<HeadlessWallet> {
    Router::new()
        .route("/pending", get(get_pending))
        .route("/authorize", post(post_authorize))
        .route("/reject", post(post_reject))
        .route("/authorize-all", post(post_authorize_all))
        .route("/reject-all", post(post_reject_all))
        .route("/networks", get(get_networks).post(post_network))
        .route("/networks/switch", post(post_switch_network))
        .route("/accounts", get(get_accounts).post(post_accounts))
}

async fn get_pending(
    State(wallet): State<HeadlessWallet>,
    Query(filter): Query<MethodFilter>,
) -> Json<ApiResponse<Pending>> {
    let method = filter.method.as_deref();
    let requests = wallet
        .pending_requests()
        .into_iter()
        .filter(|req| method.is_none_or(|m| req.method == m))
        .collect::<Vec<_>>();
    Json(ApiResponse::Ok(Pending { count: requests.len(), requests }))
}

/// Completes once the authorized request has been processed, which may be a request that has
/// not arrived yet.
async fn post_authorize(
    State(wallet): State<HeadlessWallet>,
    Json(Authorize { method }): Json<Authorize>,
) -> Json<ApiResponse<()>> {
    debug!(target: "wallet::server", %method, "authorize");
    Json(wallet.authorize(&method).await.into())
}

async fn post_reject(
    State(wallet): State<HeadlessWallet>,
    Json(Reject { method, reason }): Json<Reject>,
) -> Json<ApiResponse<()>> {
    debug!(target: "wallet::server", %method, "reject");
    wallet.reject(&method, reason.map(RpcError::user_rejected_with)).await;
    Json(ApiResponse::Ok(()))
}

async fn post_authorize_all(State(wallet): State<HeadlessWallet>) -> Json<ApiResponse<()>> {
    Json(wallet.authorize_all().await.into())
}

async fn post_reject_all(
    State(wallet): State<HeadlessWallet>,
    Json(RejectAll { reason }): Json<RejectAll>,
) -> Json<ApiResponse<()>> {
    wallet.reject_all(reason.map(RpcError::user_rejected_with)).await;
    Json(ApiResponse::Ok(()))
}

async fn get_networks(State(wallet): State<HeadlessWallet>) -> Json<ApiResponse<Vec<Chain>>> {
    Json(ApiResponse::Ok(wallet.chains()))
}

async fn post_network(
    State(wallet): State<HeadlessWallet>,
    Json(chain): Json<Chain>,
) -> Json<ApiResponse<Vec<Chain>>> {
    wallet.add_chain(chain);
    Json(ApiResponse::Ok(wallet.chains()))
}

async fn post_switch_network(
    State(wallet): State<HeadlessWallet>,
    Json(SwitchNetwork { chain_id }): Json<SwitchNetwork>,
) -> Json<ApiResponse<Chain>> {
    Json(wallet.switch_chain(chain_id).and_then(|()| wallet.chain()).into())
}

async fn get_accounts(State(wallet): State<HeadlessWallet>) -> Json<ApiResponse<Vec<Address>>> {
    Json(ApiResponse::Ok(wallet.accounts()))
}

async fn post_accounts(
    State(wallet): State<HeadlessWallet>,
    Json(ChangeAccounts { private_keys }): Json<ChangeAccounts>,
) -> Json<ApiResponse<Vec<Address>>> {
    Json(wallet.change_accounts(&private_keys).into())
}
