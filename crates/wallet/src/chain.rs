//! Known chains and the active one.

use crate::{
    error::{Result, WalletError},
    events::{EventEmitter, WalletEvent},
    transport::{ChainTransport, HttpTransport, InvalidUrl},
};
use alloy_primitives::ChainId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info};

/// A chain the wallet can connect to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    #[serde(rename = "chainId", with = "crate::serde_helpers::chain_id")]
    pub id: ChainId,
    #[serde(default)]
    pub rpc_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Chain {
    pub fn new(id: ChainId, rpc_url: impl Into<String>) -> Self {
        Self { id, rpc_url: rpc_url.into(), name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Default)]
struct ChainsInner {
    chains: Vec<Chain>,
    active: Option<ChainId>,
    transports: HashMap<ChainId, Arc<dyn ChainTransport>>,
}

/// The chain list and the active chain pointer.
///
/// An empty list leaves the wallet disconnected.
#[derive(Clone, Debug)]
pub struct Chains {
    inner: Arc<RwLock<ChainsInner>>,
    /// Used for every chain instead of an http client per chain, if set.
    transport: Option<Arc<dyn ChainTransport>>,
    events: EventEmitter,
}

impl Chains {
    /// The first chain becomes the active one.
    pub fn new(
        chains: Vec<Chain>,
        transport: Option<Arc<dyn ChainTransport>>,
        events: EventEmitter,
    ) -> Self {
        let mut inner = ChainsInner::default();
        for chain in chains {
            upsert(&mut inner, chain);
        }
        inner.active = inner.chains.first().map(|c| c.id);
        Self { inner: Arc::new(RwLock::new(inner)), transport, events }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.read().active.is_some()
    }

    /// The active chain.
    pub fn active(&self) -> Result<Chain> {
        let inner = self.inner.read();
        let id = inner.active.ok_or(WalletError::Disconnected)?;
        inner.chains.iter().find(|c| c.id == id).cloned().ok_or(WalletError::Disconnected)
    }

    pub fn active_id(&self) -> Result<ChainId> {
        self.inner.read().active.ok_or(WalletError::Disconnected)
    }

    pub fn all(&self) -> Vec<Chain> {
        self.inner.read().chains.clone()
    }

    pub fn ids(&self) -> Vec<ChainId> {
        self.inner.read().chains.iter().map(|c| c.id).collect()
    }

    pub fn get(&self, id: ChainId) -> Option<Chain> {
        self.inner.read().chains.iter().find(|c| c.id == id).cloned()
    }

    /// Adds `chain`, replacing a chain with the same id.
    ///
    /// The active chain only changes when there was none, the added chain then becomes active.
    pub fn add(&self, chain: Chain) {
        let id = chain.id;
        let activated = {
            let mut inner = self.inner.write();
            upsert(&mut inner, chain);
            let activated = inner.active.is_none();
            if activated {
                inner.active = Some(id);
            }
            activated
        };
        debug!(target: "wallet::chain", chain_id = id, "added chain");
        if activated {
            self.events.emit(WalletEvent::ChainChanged(id));
        }
    }

    /// Switches to the chain `id`.
    ///
    /// Returns `false` without emitting `chainChanged` if `id` is already active.
    pub fn switch(&self, id: ChainId) -> Result<bool> {
        {
            let mut inner = self.inner.write();
            if !inner.chains.iter().any(|c| c.id == id) {
                return Err(WalletError::ChainDisconnected(id));
            }
            if inner.active == Some(id) {
                return Ok(false);
            }
            inner.active = Some(id);
        }
        info!(target: "wallet::chain", chain_id = id, "switched chain");
        self.events.emit(WalletEvent::ChainChanged(id));
        Ok(true)
    }

    /// The transport of the active chain.
    pub fn transport(&self) -> Result<Arc<dyn ChainTransport>> {
        let chain = self.active()?;
        if let Some(transport) = &self.transport {
            return Ok(transport.clone());
        }
        if let Some(transport) = self.inner.read().transports.get(&chain.id) {
            return Ok(transport.clone());
        }
        let transport: Arc<dyn ChainTransport> = match chain.rpc_url.parse() {
            Ok(url) => Arc::new(HttpTransport::new(url)),
            Err(err) => Arc::new(InvalidUrl { url: chain.rpc_url.clone(), error: err.to_string() }),
        };
        self.inner.write().transports.insert(chain.id, transport.clone());
        Ok(transport)
    }
}

fn upsert(inner: &mut ChainsInner, chain: Chain) {
    inner.transports.remove(&chain.id);
    match inner.chains.iter_mut().find(|c| c.id == chain.id) {
        Some(existing) => *existing = chain,
        None => inner.chains.push(chain),
    }
}
