use super::param;
use crate::{
    accounts::Accounts,
    chain::Chains,
    engine::{Middleware, Next},
    error::{Result, ToRpcResponseResult, WalletError},
    transport::ChainTransport,
};
use alloy_eips::eip2718::Encodable2718;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{B256, U64, U128, hex};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use headless_rpc::{request::RpcMethodCall, response::ResponseResult};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

/// Signs `eth_sendTransaction` requests locally and submits them as raw transactions.
#[derive(Debug)]
pub struct TransactionResponder {
    accounts: Accounts,
    chains: Chains,
}

impl TransactionResponder {
    pub fn new(accounts: Accounts, chains: Chains) -> Self {
        Self { accounts, chains }
    }

    /// Handler for `eth_sendTransaction`
    async fn send_transaction(&self, call: &RpcMethodCall) -> Result<B256> {
        let mut raw: Value = param(call, 0)?;
        // dapps commonly send the gas limit as `gasLimit`
        if let Some(obj) = raw.as_object_mut()
            && !obj.contains_key("gas")
            && let Some(limit) = obj.remove("gasLimit")
        {
            obj.insert("gas".to_string(), limit);
        }
        let mut request: TransactionRequest = serde_json::from_value(raw)?;

        let signer = match request.from {
            Some(from) => self.accounts.signer(from),
            None => self.accounts.first(),
        }
        .ok_or(WalletError::Unauthorized)?;
        let from = signer.address();
        request.from = Some(from);

        let transport = self.chains.transport()?;
        if request.chain_id.is_none() {
            request.chain_id = Some(self.chains.active_id()?);
        }
        if request.nonce.is_none() {
            let nonce: U64 =
                fetch(&*transport, "eth_getTransactionCount", json!([from, "pending"])).await?;
            request.nonce = Some(nonce.to());
        }

        let estimate: U64 = fetch(&*transport, "eth_estimateGas", json!([request])).await?;
        let estimate = estimate.to::<u64>();
        request.gas = Some(request.gas.map_or(estimate, |gas| gas.max(estimate)));

        match (request.gas_price, request.max_fee_per_gas) {
            (None, None) => {
                let price: U128 = fetch(&*transport, "eth_gasPrice", json!([])).await?;
                request.gas_price = Some(price.to());
            }
            (None, Some(max_fee)) if request.max_priority_fee_per_gas.is_none() => {
                let tip: U128 =
                    fetch(&*transport, "eth_maxPriorityFeePerGas", json!([])).await?;
                request.max_priority_fee_per_gas = Some(tip.to::<u128>().min(max_fee));
            }
            _ => {}
        }

        debug!(target: "wallet::rpc", ?request, "signing transaction");
        let wallet = EthereumWallet::from(signer);
        let envelope = request
            .build(&wallet)
            .await
            .map_err(|err| WalletError::TransactionBuilder(err.to_string()))?;
        let hash = *envelope.tx_hash();
        info!(target: "wallet::rpc", %from, %hash, "submitting transaction");

        let raw_tx = hex::encode_prefixed(envelope.encoded_2718());
        fetch(&*transport, "eth_sendRawTransaction", json!([raw_tx])).await
    }
}

/// Sends a call to the chain and deserializes its result.
async fn fetch<T: DeserializeOwned>(
    transport: &dyn ChainTransport,
    method: &str,
    params: Value,
) -> Result<T> {
    let value = transport.send(method, params).await?;
    serde_json::from_value(value).map_err(|err| {
        WalletError::Rpc(headless_rpc::error::RpcError::internal_error_with(format!(
            "unexpected {method} response: {err}"
        )))
    })
}

#[async_trait]
impl Middleware for TransactionResponder {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult {
        match call.method.as_str() {
            "eth_sendTransaction" => self.send_transaction(call).await.to_rpc_result(),
            _ => next.run(call).await,
        }
    }
}
