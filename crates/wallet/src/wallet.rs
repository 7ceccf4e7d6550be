//! The wallet as seen by its host: an EIP-1193 `request` plus the test controls.

use crate::{
    accounts::{Accounts, parse_private_keys},
    chain::{Chain, Chains},
    config::WalletConfig,
    engine::Engine,
    error::WalletError,
    events::{EventEmitter, EventKind, ListenerId, WalletEvent},
    middleware::{
        AccountsResponder, AuthorizationGate, ChainResponder, Connection, Fallback, Logger,
        PassThrough, PermissionResponder, SignResponder, TransactionResponder,
    },
    permissions::{ORIGIN, Permissions},
    queue::{PendingRequests, RequestInfo},
};
use alloy_primitives::{Address, ChainId};
use headless_rpc::{
    error::RpcError,
    request::{RequestParams, RpcMethodCall},
    response::RpcResponse,
};
use serde_json::Value;
use tracing::{info, trace};

/// A headless EIP-1193 wallet.
///
/// Cheap to clone, all clones share the same state.
#[derive(Clone, Debug)]
pub struct HeadlessWallet {
    engine: Engine,
    accounts: Accounts,
    permissions: Permissions,
    queue: PendingRequests,
    chains: Chains,
    events: EventEmitter,
}

impl HeadlessWallet {
    /// Creates the wallet and its request pipeline.
    ///
    /// Fails if one of the private keys is invalid.
    pub fn new(config: WalletConfig) -> Result<Self, WalletError> {
        let WalletConfig { private_keys, chains, debug, logger, permitted, transport } = config;

        let events = EventEmitter::new();
        let accounts = Accounts::new(parse_private_keys(&private_keys)?);
        let permissions = Permissions::new(permitted);
        let queue = PendingRequests::new();
        let chains = Chains::new(chains, transport, events.clone());
        let connection =
            Connection::new(accounts.clone(), permissions.clone(), chains.clone(), events.clone());

        let engine = Engine::new()
            .with(Logger::new(debug, logger))
            .with(AuthorizationGate::new(permissions.clone(), queue.clone()))
            .with(AccountsResponder::new(connection.clone()))
            .with(ChainResponder::new(chains.clone()))
            .with(PermissionResponder::new(connection))
            .with(SignResponder::new(accounts.clone()))
            .with(TransactionResponder::new(accounts.clone(), chains.clone()))
            .with(PassThrough::new(chains.clone()))
            .with(Fallback);

        info!(
            target: "wallet",
            accounts = private_keys.len(),
            chains = chains.ids().len(),
            "created wallet"
        );
        Ok(Self { engine, accounts, permissions, queue, chains, events })
    }

    /// Handles an EIP-1193 request.
    pub async fn request(
        &self,
        method: impl Into<String>,
        params: impl Into<RequestParams>,
    ) -> Result<Value, RpcError> {
        let call = RpcMethodCall::new(method, params);
        self.engine.handle(&call).await.into_result()
    }

    /// Handles a JSON-RPC method call, answering with the call's id.
    pub async fn handle(&self, call: RpcMethodCall) -> RpcResponse {
        trace!(target: "wallet::rpc", id = %call.id, method = %call.method, "handle call");
        let res = self.engine.handle(&call).await;
        RpcResponse::new(call.id(), res)
    }

    /// Whether there is an active chain.
    pub fn is_connected(&self) -> bool {
        self.chains.is_connected()
    }

    /// All account addresses, regardless of permissions.
    pub fn accounts(&self) -> Vec<Address> {
        self.accounts.addresses()
    }

    /// Replaces the accounts and emits `accountsChanged`.
    pub fn change_accounts<I, S>(&self, private_keys: I) -> Result<Vec<Address>, WalletError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = self.accounts.replace(parse_private_keys(private_keys)?);
        info!(target: "wallet", accounts = addresses.len(), "changed accounts");
        self.events.emit(WalletEvent::AccountsChanged(addresses.clone()));
        Ok(addresses)
    }

    /// The active chain.
    pub fn chain(&self) -> Result<Chain, WalletError> {
        self.chains.active()
    }

    pub fn chains(&self) -> Vec<Chain> {
        self.chains.all()
    }

    pub fn chain_ids(&self) -> Vec<ChainId> {
        self.chains.ids()
    }

    /// Adds a chain, replacing a known chain with the same id.
    pub fn add_chain(&self, chain: Chain) {
        self.chains.add(chain)
    }

    /// Switches the active chain, emitting `chainChanged` if it changed.
    pub fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        self.chains.switch(chain_id).map(drop)
    }

    /// Number of requests waiting for an authorization, optionally only those for `method`.
    pub fn pending_request_count(&self, method: Option<&str>) -> usize {
        self.queue.count(method)
    }

    /// The requests waiting for an authorization, oldest first.
    pub fn pending_requests(&self) -> Vec<RequestInfo> {
        self.queue.requests()
    }

    /// Number of authorizations or rejections recorded before their request arrived.
    pub fn pending_action_count(&self, method: Option<&str>) -> usize {
        self.queue.action_count(method)
    }

    /// Authorizes the oldest pending `method` request, or the next one to arrive.
    ///
    /// The authorization takes effect when this is called, the returned future completes once
    /// the request has been processed.
    pub fn authorize(
        &self,
        method: &str,
    ) -> impl Future<Output = Result<(), WalletError>> + Send + use<> {
        info!(target: "wallet", method, "authorize");
        self.queue.authorize(method)
    }

    /// Rejects the oldest pending `method` request, or the next one to arrive.
    ///
    /// Rejects with "User Rejected Request" if no `reason` is given.
    pub fn reject(
        &self,
        method: &str,
        reason: Option<RpcError>,
    ) -> impl Future<Output = ()> + Send + use<> {
        info!(target: "wallet", method, "reject");
        self.queue.reject(method, reason.unwrap_or_else(RpcError::user_rejected))
    }

    /// Authorizes every pending request.
    pub fn authorize_all(&self) -> impl Future<Output = Result<(), WalletError>> + Send + use<> {
        info!(target: "wallet", pending = self.queue.count(None), "authorize all");
        self.queue.authorize_all()
    }

    /// Rejects every pending request.
    pub fn reject_all(&self, reason: Option<RpcError>) -> impl Future<Output = ()> + Send + use<> {
        info!(target: "wallet", pending = self.queue.count(None), "reject all");
        self.queue.reject_all(reason.unwrap_or_else(RpcError::user_rejected))
    }

    /// Grants `method` so it no longer needs an authorization.
    pub fn permit(&self, method: impl Into<String>) {
        self.permissions.permit(method, ORIGIN);
    }

    /// Revokes a grant made with [`Self::permit`] or by the dapp.
    pub fn revoke(&self, method: &str) -> bool {
        self.permissions.revoke(method, ORIGIN)
    }

    pub fn is_permitted(&self, method: &str) -> bool {
        self.permissions.is_permitted(method, ORIGIN)
    }

    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&WalletEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, listener)
    }

    pub fn once<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&WalletEvent) + Send + Sync + 'static,
    {
        self.events.once(kind, listener)
    }

    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        self.events.off(kind, id)
    }
}
