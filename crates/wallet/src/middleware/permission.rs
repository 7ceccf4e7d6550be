use super::{Connection, accounts::ETH_ACCOUNTS, param};
use crate::{
    engine::{Middleware, Next},
    error::{Result, ToRpcResponseResult, WalletError},
    permissions::{ORIGIN, Permission},
};
use async_trait::async_trait;
use headless_rpc::{request::RpcMethodCall, response::ResponseResult};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// The permission descriptor returned for a granted request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestedPermission {
    parent_capability: &'static str,
}

/// Implements the [EIP-2255](https://eips.ethereum.org/EIPS/eip-2255) permission methods.
#[derive(Debug)]
pub struct PermissionResponder {
    connection: Connection,
}

impl PermissionResponder {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    fn request_permissions(&self, call: &RpcMethodCall) -> Result<Vec<RequestedPermission>> {
        let requested: Map<String, Value> = param(call, 0).map_err(|_| WalletError::Denied)?;
        if !requested.contains_key(ETH_ACCOUNTS) {
            return Err(WalletError::Denied);
        }
        self.connection.connect();
        Ok(vec![RequestedPermission { parent_capability: ETH_ACCOUNTS }])
    }

    fn get_permissions(&self) -> Result<Vec<Permission>> {
        Ok(self.connection.permissions.get(ORIGIN))
    }

    fn revoke_permissions(&self, call: &RpcMethodCall) -> Result<()> {
        let revoked: Map<String, Value> = param(call, 0)?;
        for capability in revoked.keys() {
            if capability == ETH_ACCOUNTS {
                self.connection.disconnect();
            } else {
                self.connection.permissions.revoke(capability, ORIGIN);
            }
            debug!(target: "wallet::permissions", %capability, "wallet_revokePermissions");
        }
        Ok(())
    }
}

#[async_trait]
impl Middleware for PermissionResponder {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult {
        match call.method.as_str() {
            "wallet_requestPermissions" => self.request_permissions(call).to_rpc_result(),
            "wallet_getPermissions" => self.get_permissions().to_rpc_result(),
            "wallet_revokePermissions" => self.revoke_permissions(call).to_rpc_result(),
            _ => next.run(call).await,
        }
    }
}
