use super::param;
use crate::{
    accounts::Accounts,
    engine::{Middleware, Next},
    error::{Result, ToRpcResponseResult, WalletError},
};
use alloy_dyn_abi::{DynSolType, TypedData};
use alloy_primitives::{Address, B256, hex, keccak256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use headless_rpc::{request::RpcMethodCall, response::ResponseResult};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// The bytes `personal_sign` signs: hex decoded if `0x` prefixed valid hex, else the UTF-8 text.
pub(crate) fn message_bytes(message: &str) -> Vec<u8> {
    if message.starts_with("0x")
        && let Ok(bytes) = hex::decode(message)
    {
        return bytes;
    }
    message.as_bytes().to_vec()
}

/// A field of legacy (`eth_signTypedData_v1`) typed data.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TypedDataField {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    value: Value,
}

/// Hash of legacy typed data, `keccak256(keccak256(schema) || keccak256(values))`.
///
/// The schema is the packed `"<type> <name>"` strings, the values are packed by their types.
pub(crate) fn typed_data_v1_hash(fields: &[TypedDataField]) -> Result<B256> {
    if fields.is_empty() {
        return Err(WalletError::invalid_params("typed data must not be empty"));
    }
    let mut schema = Vec::new();
    let mut values = Vec::new();
    for field in fields {
        let ty = DynSolType::parse(&field.kind).map_err(|err| {
            WalletError::invalid_params(format!("typed data field {}: {err}", field.name))
        })?;
        let value = ty.coerce_json(&field.value).map_err(|err| {
            WalletError::invalid_params(format!("typed data field {}: {err}", field.name))
        })?;
        schema.extend_from_slice(format!("{} {}", field.kind, field.name).as_bytes());
        values.extend(value.abi_encode_packed());
    }
    Ok(keccak256([keccak256(schema).as_slice(), keccak256(values).as_slice()].concat()))
}

/// Signs messages and typed data with the local accounts.
#[derive(Debug)]
pub struct SignResponder {
    accounts: Accounts,
}

impl SignResponder {
    pub fn new(accounts: Accounts) -> Self {
        Self { accounts }
    }

    fn signer(&self, address: Address) -> Result<PrivateKeySigner> {
        self.accounts.signer(address).ok_or(WalletError::Unauthorized)
    }

    /// Handler for `personal_sign`, params `[message, address]`
    async fn personal_sign(&self, call: &RpcMethodCall) -> Result<String> {
        let message: String = param(call, 0)?;
        let address: Address = param(call, 1)?;
        let signer = self.signer(address)?;
        debug!(target: "wallet::rpc", %address, "personal_sign");
        let signature = signer.sign_message(&message_bytes(&message)).await?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }

    /// Handler for `eth_signTypedData_v3` and `eth_signTypedData_v4`, params `[address, data]`
    ///
    /// `data` is accepted both as a JSON string and as an object.
    async fn sign_typed_data(&self, call: &RpcMethodCall) -> Result<String> {
        let address: Address = param(call, 0)?;
        let data: TypedData = match param::<Value>(call, 1)? {
            Value::String(json) => serde_json::from_str(&json)?,
            value => serde_json::from_value(value)?,
        };
        let signer = self.signer(address)?;
        debug!(target: "wallet::rpc", %address, primary_type = %data.primary_type, "sign typed data");
        let signature = signer.sign_dynamic_typed_data(&data).await?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }

    /// Handler for `eth_signTypedData` and `eth_signTypedData_v1`, params `[data, address]`
    ///
    /// The hash is signed as is, without a message prefix.
    async fn sign_typed_data_v1(&self, call: &RpcMethodCall) -> Result<String> {
        let fields: Vec<TypedDataField> = match param::<Value>(call, 0)? {
            Value::String(json) => serde_json::from_str(&json)?,
            value => serde_json::from_value(value)?,
        };
        let address: Address = param(call, 1)?;
        let signer = self.signer(address)?;
        let hash = typed_data_v1_hash(&fields)?;
        debug!(target: "wallet::rpc", %address, %hash, "sign legacy typed data");
        let signature = signer.sign_hash(&hash).await?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

#[async_trait]
impl Middleware for SignResponder {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult {
        match call.method.as_str() {
            "personal_sign" => self.personal_sign(call).await.to_rpc_result(),
            "eth_signTypedData" | "eth_signTypedData_v1" => {
                self.sign_typed_data_v1(call).await.to_rpc_result()
            }
            "eth_signTypedData_v3" | "eth_signTypedData_v4" => {
                self.sign_typed_data(call).await.to_rpc_result()
            }
            _ => next.run(call).await,
        }
    }
}
