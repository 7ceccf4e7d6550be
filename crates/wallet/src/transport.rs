//! Forwarding of calls the wallet does not answer itself to a chain node.

use alloy_rpc_client::RpcClient;
use async_trait::async_trait;
use headless_rpc::error::{ErrorCode, RpcError};
use serde_json::Value;
use std::fmt;
use tracing::{debug, trace};
use url::Url;

/// Sends raw JSON-RPC calls to a chain.
#[async_trait]
pub trait ChainTransport: Send + Sync + fmt::Debug {
    /// Sends `method` with `params` and returns the node's result or error unchanged.
    async fn send(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}

/// A [`ChainTransport`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    url: Url,
    client: RpcClient,
}

impl HttpTransport {
    pub fn new(url: Url) -> Self {
        Self { client: RpcClient::new_http(url.clone()), url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ChainTransport for HttpTransport {
    async fn send(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        trace!(target: "wallet::transport", method, url = %self.url, "forwarding");
        self.client.request::<_, Value>(method.to_string(), params).await.map_err(|err| {
            match err.as_error_resp() {
                Some(payload) => RpcError {
                    code: ErrorCode::from(payload.code),
                    message: payload.message.clone(),
                    data: payload.try_data_as::<Value>().and_then(Result::ok),
                },
                None => {
                    debug!(target: "wallet::transport", method, %err, "transport failure");
                    RpcError::internal_error_with(err.to_string())
                }
            }
        })
    }
}

/// A transport for chains whose rpc url could not be parsed, every call fails.
#[derive(Clone, Debug)]
pub(crate) struct InvalidUrl {
    pub url: String,
    pub error: String,
}

#[async_trait]
impl ChainTransport for InvalidUrl {
    async fn send(&self, method: &str, _params: Value) -> Result<Value, RpcError> {
        Err(RpcError::internal_error_with(format!(
            "cannot forward {method}, invalid rpc url {:?}: {}",
            self.url, self.error
        )))
    }
}
