use alloy_primitives::{Address, address, hex, keccak256};
use async_trait::async_trait;
use headless_wallet::{
    ChainTransport, HeadlessWallet, WalletConfig,
    rpc::error::{ErrorCode, RpcError},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};

/// The first two anvil dev accounts
pub const DEV_KEYS: [&str; 2] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
];

pub const DEV_ADDRESSES: [Address; 2] = [
    address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
    address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"),
];

/// A chain node stub that records every call and answers with canned results.
#[derive(Debug, Default)]
pub struct MockTransport {
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(method, _)| method.clone()).collect()
    }
}

#[async_trait]
impl ChainTransport for MockTransport {
    async fn send(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.calls.lock().push((method.to_string(), params.clone()));
        match method {
            "eth_blockNumber" => Ok(json!("0x2a")),
            "eth_getBalance" => Ok(json!("0xde0b6b3a7640000")),
            "eth_getTransactionCount" => Ok(json!("0x3")),
            "eth_estimateGas" => Ok(json!("0x5208")),
            "eth_gasPrice" => Ok(json!("0x3b9aca00")),
            "eth_maxPriorityFeePerGas" => Ok(json!("0x77359400")),
            "eth_sendRawTransaction" => {
                let raw = params[0].as_str().unwrap_or_default();
                let bytes = hex::decode(raw).map_err(|err| RpcError::invalid_params(err.to_string()))?;
                Ok(json!(keccak256(bytes)))
            }
            "eth_call" => Err(RpcError {
                code: ErrorCode::ServerError(3),
                message: "execution reverted".into(),
                data: Some(json!("0x08c379a0")),
            }),
            _ => Err(RpcError::method_not_found()),
        }
    }
}

/// A wallet with both dev accounts on the default chain, reaching the chain through a
/// [`MockTransport`].
pub fn test_wallet() -> (HeadlessWallet, Arc<MockTransport>) {
    test_wallet_with(WalletConfig::test())
}

pub fn test_wallet_with(config: WalletConfig) -> (HeadlessWallet, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::default());
    let wallet = HeadlessWallet::new(
        config.with_private_keys(DEV_KEYS).with_transport(transport.clone()),
    )
    .unwrap();
    (wallet, transport)
}

/// Waits until `count` requests for `method` are queued.
pub async fn wait_for_pending(wallet: &HeadlessWallet, method: &str, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while wallet.pending_request_count(Some(method)) < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {count} pending {method} requests"));
}
