use crate::{
    engine::{Middleware, Next},
    error::WalletError,
    permissions::{ORIGIN, Permissions},
    queue::{Admission, Decision, PendingRequests, RequestInfo, Resolution},
};
use async_trait::async_trait;
use headless_rpc::{request::RpcMethodCall, response::ResponseResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

/// The methods that change wallet state or disclose account data, and so need an authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    #[serde(rename = "eth_requestAccounts")]
    RequestAccounts,
    #[serde(rename = "eth_sendTransaction")]
    SendTransaction,
    #[serde(rename = "wallet_addEthereumChain")]
    AddEthereumChain,
    #[serde(rename = "wallet_switchEthereumChain")]
    SwitchEthereumChain,
    #[serde(rename = "wallet_requestPermissions")]
    RequestPermissions,
    #[serde(rename = "personal_sign")]
    PersonalSign,
    #[serde(rename = "eth_signTypedData")]
    SignTypedData,
    #[serde(rename = "eth_signTypedData_v1")]
    SignTypedDataV1,
    #[serde(rename = "eth_signTypedData_v3")]
    SignTypedDataV3,
    #[serde(rename = "eth_signTypedData_v4")]
    SignTypedDataV4,
}

impl RequestKind {
    pub const ALL: [Self; 10] = [
        Self::RequestAccounts,
        Self::SendTransaction,
        Self::AddEthereumChain,
        Self::SwitchEthereumChain,
        Self::RequestPermissions,
        Self::PersonalSign,
        Self::SignTypedData,
        Self::SignTypedDataV1,
        Self::SignTypedDataV3,
        Self::SignTypedDataV4,
    ];

    /// The JSON-RPC method name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RequestAccounts => "eth_requestAccounts",
            Self::SendTransaction => "eth_sendTransaction",
            Self::AddEthereumChain => "wallet_addEthereumChain",
            Self::SwitchEthereumChain => "wallet_switchEthereumChain",
            Self::RequestPermissions => "wallet_requestPermissions",
            Self::PersonalSign => "personal_sign",
            Self::SignTypedData => "eth_signTypedData",
            Self::SignTypedDataV1 => "eth_signTypedData_v1",
            Self::SignTypedDataV3 => "eth_signTypedData_v3",
            Self::SignTypedDataV4 => "eth_signTypedData_v4",
        }
    }
}

impl AsRef<str> for RequestKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| WalletError::invalid_params(format!("{s} does not need an authorization")))
    }
}

/// Whether `method` needs an authorization.
pub fn is_unsafe(method: &str) -> bool {
    RequestKind::ALL.iter().any(|kind| kind.as_str() == method)
}

/// Holds back unsafe calls until they are authorized or rejected.
///
/// Calls that are not unsafe, or whose method is permitted, pass straight through. Every other
/// call is matched against a recorded action or queued, and only continues down the chain once
/// authorized. A rejected call never reaches the rest of the chain.
#[derive(Debug)]
pub struct AuthorizationGate {
    permissions: Permissions,
    queue: PendingRequests,
}

impl AuthorizationGate {
    pub fn new(permissions: Permissions, queue: PendingRequests) -> Self {
        Self { permissions, queue }
    }
}

#[async_trait]
impl Middleware for AuthorizationGate {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult {
        if !is_unsafe(&call.method) || self.permissions.is_permitted(&call.method, ORIGIN) {
            return next.run(call).await;
        }

        let resolution = match self.queue.admit(RequestInfo::new(&call.method, call.params.clone())) {
            Admission::Resolved(resolution) => resolution,
            Admission::Queued(rx) => match rx.await {
                Ok(resolution) => resolution,
                Err(_) => {
                    return ResponseResult::Error(
                        WalletError::RequestDropped(call.method.clone()).into(),
                    );
                }
            },
        };

        let Resolution { decision, done } = resolution;
        let res = match decision {
            Decision::Authorize => {
                debug!(target: "wallet::rpc", method = %call.method, "authorized");
                next.run(call).await
            }
            Decision::Reject(err) => {
                debug!(target: "wallet::rpc", method = %call.method, code = err.code.code(), "rejected");
                ResponseResult::Error(err)
            }
        };
        let _ = done.send(());
        res
    }
}
