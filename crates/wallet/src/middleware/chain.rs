use super::param;
use crate::{
    chain::{Chain, Chains},
    engine::{Middleware, Next},
    error::{Result, ToRpcResponseResult, WalletError},
    serde_helpers::parse_chain_id,
};
use alloy_primitives::ChainId;
use async_trait::async_trait;
use headless_rpc::{request::RpcMethodCall, response::ResponseResult};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// `wallet_addEthereumChain` parameter, see [EIP-3085](https://eips.ethereum.org/EIPS/eip-3085)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddEthereumChain {
    chain_id: Value,
    #[serde(default)]
    rpc_urls: Vec<String>,
    #[serde(default)]
    chain_name: Option<String>,
}

/// `wallet_switchEthereumChain` parameter, see [EIP-3326](https://eips.ethereum.org/EIPS/eip-3326)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwitchEthereumChain {
    chain_id: Value,
}

fn chain_id(value: &Value) -> Result<ChainId> {
    parse_chain_id(value).ok_or_else(|| WalletError::invalid_params(format!("invalid chainId {value}")))
}

/// Answers chain identity queries and adds or switches chains.
#[derive(Debug)]
pub struct ChainResponder {
    chains: Chains,
}

impl ChainResponder {
    pub fn new(chains: Chains) -> Self {
        Self { chains }
    }

    fn chain_id(&self) -> Result<String> {
        Ok(format!("{:#x}", self.chains.active_id()?))
    }

    fn net_version(&self) -> Result<ChainId> {
        self.chains.active_id()
    }

    fn add_ethereum_chain(&self, call: &RpcMethodCall) -> Result<()> {
        let params: AddEthereumChain = param(call, 0)?;
        let id = chain_id(&params.chain_id)?;
        let rpc_url = params.rpc_urls.into_iter().next().unwrap_or_default();
        info!(target: "wallet::chain", chain_id = id, %rpc_url, "wallet_addEthereumChain");
        let mut chain = Chain::new(id, rpc_url);
        chain.name = params.chain_name;
        self.chains.add(chain);
        Ok(())
    }

    fn switch_ethereum_chain(&self, call: &RpcMethodCall) -> Result<()> {
        let params: SwitchEthereumChain = param(call, 0)?;
        self.chains.switch(chain_id(&params.chain_id)?)?;
        Ok(())
    }
}

#[async_trait]
impl Middleware for ChainResponder {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult {
        match call.method.as_str() {
            "eth_chainId" => self.chain_id().to_rpc_result(),
            "net_version" => self.net_version().to_rpc_result(),
            "wallet_addEthereumChain" => self.add_ethereum_chain(call).to_rpc_result(),
            "wallet_switchEthereumChain" => self.switch_ethereum_chain(call).to_rpc_result(),
            _ => next.run(call).await,
        }
    }
}
