//! The handlers of the request pipeline, in the order the wallet chains them.

mod accounts;
mod chain;
mod fallback;
mod gate;
mod logger;
mod passthrough;
mod permission;
mod sign;
mod transaction;

pub use accounts::{AccountsResponder, Connection};
pub use chain::ChainResponder;
pub use fallback::Fallback;
pub use gate::{AuthorizationGate, RequestKind, is_unsafe};
pub use logger::Logger;
pub use passthrough::{PASSTHROUGH_METHODS, PassThrough};
pub use permission::PermissionResponder;
pub use sign::SignResponder;
pub use transaction::TransactionResponder;

use crate::error::{Result, WalletError};
use headless_rpc::request::RpcMethodCall;
use serde::de::DeserializeOwned;

/// Deserializes the positional parameter `index` of `call`.
pub(crate) fn param<T: DeserializeOwned>(call: &RpcMethodCall, index: usize) -> Result<T> {
    let value = call.params.get(index).ok_or_else(|| {
        WalletError::invalid_params(format!("{} expects a parameter at index {index}", call.method))
    })?;
    serde_json::from_value(value.clone()).map_err(|err| {
        WalletError::invalid_params(format!("{} parameter {index}: {err}", call.method))
    })
}
