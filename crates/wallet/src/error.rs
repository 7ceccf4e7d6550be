//! Aggregated error type for the wallet

use alloy_primitives::ChainId;
use alloy_signer_local::LocalSignerError;
use headless_rpc::{
    error::{ErrorCode, RpcError},
    response::ResponseResult,
};
use serde::Serialize;
use tracing::error;

pub(crate) type Result<T> = std::result::Result<T, WalletError>;

#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error("Failed to create wallet from private key: {0}")]
    InvalidKey(#[from] LocalSignerError),
    #[error("Failed to create wallet from private key. Private key is empty")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("User Rejected Request")]
    Denied,
    #[error("The requested method and/or account has not been authorized by the user.")]
    Unauthorized,
    #[error("The Provider does not support the requested method: {0}")]
    UnsupportedMethod(String),
    #[error("The Provider is disconnected from all chains.")]
    Disconnected,
    #[error("The Provider is not connected to the requested chain: {0}")]
    ChainDisconnected(ChainId),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("pending `{0}` request was dropped before it was resolved")]
    RequestDropped(String),
    #[error("Failed to build transaction: {0}")]
    TransactionBuilder(String),
    #[error(transparent)]
    PrivateKey(#[from] PrivateKeyError),
    #[error(transparent)]
    Signer(#[from] alloy_signer::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("Rpc error {0:?}")]
    Rpc(RpcError),
}

impl WalletError {
    /// Shorthand for [`WalletError::InvalidParams`].
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }
}

impl From<RpcError> for WalletError {
    fn from(err: RpcError) -> Self {
        Self::Rpc(err)
    }
}

impl From<WalletError> for RpcError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Denied => Self::user_rejected(),
            WalletError::Unauthorized => Self::unauthorized(),
            WalletError::UnsupportedMethod(method) => Self::unsupported_method(method),
            WalletError::Disconnected => Self::disconnected(),
            WalletError::ChainDisconnected(chain_id) => Self {
                code: ErrorCode::ChainDisconnected,
                message: ErrorCode::ChainDisconnected.message().into(),
                data: Some(format!("{chain_id:#x}").into()),
            },
            WalletError::InvalidParams(msg) => Self::invalid_params(msg),
            err @ WalletError::TransactionBuilder(_) => Self::invalid_params(err.to_string()),
            WalletError::PrivateKey(err) => Self::invalid_params(err.to_string()),
            WalletError::Signer(err) => {
                error!(target: "wallet::rpc", "signer error: {:?}", err);
                Self::internal_error_with(err.to_string())
            }
            WalletError::Serde(err) => Self::invalid_params(err.to_string()),
            err @ WalletError::RequestDropped(_) => Self::internal_error_with(err.to_string()),
            WalletError::Rpc(err) => err,
        }
    }
}

/// Helper trait to easily convert results to rpc results
pub(crate) trait ToRpcResponseResult {
    fn to_rpc_result(self) -> ResponseResult;
}

/// Converts a serializable value into a `ResponseResult`
pub fn to_rpc_result<T: Serialize>(val: T) -> ResponseResult {
    match serde_json::to_value(val) {
        Ok(success) => ResponseResult::Success(success),
        Err(err) => {
            error!("Failed serialize rpc response: {:?}", err);
            ResponseResult::error(RpcError::internal_error())
        }
    }
}

impl<T: Serialize> ToRpcResponseResult for Result<T> {
    fn to_rpc_result(self) -> ResponseResult {
        match self {
            Ok(val) => to_rpc_result(val),
            Err(err) => ResponseResult::Error(err.into()),
        }
    }
}
