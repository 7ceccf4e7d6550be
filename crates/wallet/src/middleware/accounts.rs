use crate::{
    accounts::Accounts,
    chain::Chains,
    engine::{Middleware, Next},
    error::{Result, ToRpcResponseResult},
    events::{EventEmitter, WalletEvent},
    permissions::{ORIGIN, Permissions},
};
use alloy_primitives::Address;
use async_trait::async_trait;
use headless_rpc::{request::RpcMethodCall, response::ResponseResult};
use tracing::info;

/// The capability that exposes the account addresses.
pub const ETH_ACCOUNTS: &str = "eth_accounts";

/// Access to the accounts as gated by the `eth_accounts` capability.
#[derive(Clone, Debug)]
pub struct Connection {
    pub(crate) accounts: Accounts,
    pub(crate) permissions: Permissions,
    pub(crate) chains: Chains,
    pub(crate) events: EventEmitter,
}

impl Connection {
    pub fn new(
        accounts: Accounts,
        permissions: Permissions,
        chains: Chains,
        events: EventEmitter,
    ) -> Self {
        Self { accounts, permissions, chains, events }
    }

    pub fn is_connected(&self) -> bool {
        self.permissions.is_permitted(ETH_ACCOUNTS, ORIGIN)
    }

    /// The addresses if `eth_accounts` is permitted, else nothing.
    pub fn visible_accounts(&self) -> Vec<Address> {
        if self.is_connected() { self.accounts.addresses() } else { Vec::new() }
    }

    /// Grants `eth_accounts` and announces the accounts.
    ///
    /// Emits `accountsChanged`, and `connect` if the capability was not granted before.
    pub fn connect(&self) -> Vec<Address> {
        let newly_connected = !self.is_connected();
        self.permissions.permit(ETH_ACCOUNTS, ORIGIN);
        let addresses = self.accounts.addresses();
        if newly_connected {
            info!(target: "wallet::rpc", accounts = addresses.len(), "connected");
        }
        self.events.emit(WalletEvent::AccountsChanged(addresses.clone()));
        if newly_connected && let Ok(chain_id) = self.chains.active_id() {
            self.events.emit(WalletEvent::Connect { chain_id });
        }
        addresses
    }

    /// Revokes `eth_accounts`, announcing an empty account list if it was granted.
    pub fn disconnect(&self) -> bool {
        let revoked = self.permissions.revoke(ETH_ACCOUNTS, ORIGIN);
        if revoked {
            self.events.emit(WalletEvent::AccountsChanged(Vec::new()));
        }
        revoked
    }
}

/// Answers `eth_accounts` and `eth_requestAccounts`.
#[derive(Debug)]
pub struct AccountsResponder {
    connection: Connection,
}

impl AccountsResponder {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.connection.visible_accounts())
    }

    fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(self.connection.connect())
    }
}

#[async_trait]
impl Middleware for AccountsResponder {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult {
        match call.method.as_str() {
            "eth_accounts" => self.accounts().to_rpc_result(),
            "eth_requestAccounts" => self.request_accounts().to_rpc_result(),
            _ => next.run(call).await,
        }
    }
}
