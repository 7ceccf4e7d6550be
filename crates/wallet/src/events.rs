//! Provider event notifications (`accountsChanged`, `chainChanged`, `connect`).

use alloy_primitives::{Address, ChainId};
use parking_lot::Mutex;
use serde::Serialize;
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tracing::trace;

/// The events a provider emits, see [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193#events-1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    #[serde(rename = "accountsChanged")]
    AccountsChanged,
    #[serde(rename = "chainChanged")]
    ChainChanged,
    #[serde(rename = "connect")]
    Connect,
}

impl EventKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccountsChanged => "accountsChanged",
            Self::ChainChanged => "chainChanged",
            Self::Connect => "connect",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An emitted event with its payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
    Connect { chain_id: ChainId },
}

impl WalletEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::AccountsChanged(_) => EventKind::AccountsChanged,
            Self::ChainChanged(_) => EventKind::ChainChanged,
            Self::Connect { .. } => EventKind::Connect,
        }
    }

    /// The payload as the JSON value an EIP-1193 listener receives.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::AccountsChanged(accounts) => serde_json::json!(accounts),
            Self::ChainChanged(chain_id) => serde_json::json!(format!("{chain_id:#x}")),
            Self::Connect { chain_id } => serde_json::json!({ "chainId": format!("{chain_id:#x}") }),
        }
    }
}

/// Identifies a registered listener, used to unsubscribe it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&WalletEvent) + Send + Sync>;

struct Subscription {
    id: ListenerId,
    once: bool,
    listener: Listener,
}

/// A publish/subscribe registry of event listeners.
///
/// Listeners run synchronously on the emitting task, in registration order. `emit` iterates a
/// snapshot, so listeners may subscribe or unsubscribe while being notified.
#[derive(Clone, Default)]
pub struct EventEmitter {
    listeners: Arc<Mutex<HashMap<EventKind, Vec<Subscription>>>>,
    next_id: Arc<AtomicU64>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for every future `kind` event.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&WalletEvent) + Send + Sync + 'static,
    {
        self.subscribe(kind, false, Arc::new(listener))
    }

    /// Registers `listener` for the next `kind` event only.
    pub fn once<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&WalletEvent) + Send + Sync + 'static,
    {
        self.subscribe(kind, true, Arc::new(listener))
    }

    /// Removes the listener, returns `false` if it was not registered.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(subs) = listeners.get_mut(&kind) else { return false };
        let len = subs.len();
        subs.retain(|sub| sub.id != id);
        subs.len() != len
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.lock().get(&kind).map_or(0, Vec::len)
    }

    /// Notifies all listeners of `event.kind()`.
    pub fn emit(&self, event: WalletEvent) {
        let kind = event.kind();
        let snapshot: Vec<Listener> = {
            let mut listeners = self.listeners.lock();
            let Some(subs) = listeners.get_mut(&kind) else { return };
            let snapshot = subs.iter().map(|sub| sub.listener.clone()).collect();
            subs.retain(|sub| !sub.once);
            snapshot
        };
        trace!(target: "wallet::events", %kind, listeners = snapshot.len(), "emit");
        for listener in snapshot {
            listener(&event);
        }
    }

    fn subscribe(&self, kind: EventKind, once: bool, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().entry(kind).or_default().push(Subscription { id, once, listener });
        id
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock();
        let counts: HashMap<_, _> = listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventEmitter").field("listeners", &counts).finish()
    }
}
