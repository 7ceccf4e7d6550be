use crate::{
    chain::Chains,
    engine::{Middleware, Next},
};
use async_trait::async_trait;
use headless_rpc::{request::RpcMethodCall, response::ResponseResult};
use tracing::trace;

/// Read-only chain methods relayed to the active chain as they are.
pub const PASSTHROUGH_METHODS: &[&str] = &[
    "eth_blockNumber",
    "eth_call",
    "eth_estimateGas",
    "eth_gasPrice",
    "eth_getBalance",
    "eth_getBlockByHash",
    "eth_getBlockByNumber",
    "eth_getBlockTransactionCountByHash",
    "eth_getBlockTransactionCountByNumber",
    "eth_getCode",
    "eth_getLogs",
    "eth_getStorageAt",
    "eth_getTransactionByBlockHashAndIndex",
    "eth_getTransactionByBlockNumberAndIndex",
    "eth_getTransactionByHash",
    "eth_getTransactionCount",
    "eth_getTransactionReceipt",
    "eth_getUncleByBlockHashAndIndex",
    "eth_getUncleByBlockNumberAndIndex",
    "eth_getUncleCountByBlockHash",
    "eth_getUncleCountByBlockNumber",
    "eth_sendRawTransaction",
];

/// Forwards [`PASSTHROUGH_METHODS`] to the transport of the active chain.
#[derive(Debug)]
pub struct PassThrough {
    chains: Chains,
}

impl PassThrough {
    pub fn new(chains: Chains) -> Self {
        Self { chains }
    }
}

#[async_trait]
impl Middleware for PassThrough {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult {
        if !PASSTHROUGH_METHODS.contains(&call.method.as_str()) {
            return next.run(call).await;
        }
        let transport = match self.chains.transport() {
            Ok(transport) => transport,
            Err(err) => return ResponseResult::Error(err.into()),
        };
        trace!(target: "wallet::rpc", method = %call.method, "passthrough");
        match transport.send(&call.method, call.params.clone().into()).await {
            Ok(value) => ResponseResult::Success(value),
            Err(err) => ResponseResult::Error(err),
        }
    }
}
