use crate::engine::{Middleware, Next};
use async_trait::async_trait;
use headless_rpc::{error::RpcError, request::RpcMethodCall, response::ResponseResult};
use tracing::debug;

/// Ends the chain, any call reaching it is unsupported.
#[derive(Debug, Default)]
pub struct Fallback;

#[async_trait]
impl Middleware for Fallback {
    async fn handle(&self, call: &RpcMethodCall, _next: Next<'_>) -> ResponseResult {
        debug!(target: "wallet::rpc", method = %call.method, "unsupported method");
        ResponseResult::Error(RpcError::unsupported_method(call.method.clone()))
    }
}
