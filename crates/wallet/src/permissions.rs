//! An [EIP-2255](https://eips.ethereum.org/EIPS/eip-2255) style permission store.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// The origin requests are attributed to. There is a single dApp per wallet.
pub const ORIGIN: &str = "";

/// Permissions granted at this origin apply to every origin.
pub const WILDCARD_ORIGIN: &str = "*";

/// A restriction attached to a permission. Recorded, never evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caveat {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: serde_json::Value,
}

/// A granted capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub invoker: String,
    pub parent_capability: String,
    #[serde(default)]
    pub caveats: Vec<Caveat>,
}

impl Permission {
    pub fn new(invoker: impl Into<String>, capability: impl Into<String>) -> Self {
        Self { invoker: invoker.into(), parent_capability: capability.into(), caveats: Vec::new() }
    }
}

/// Tracks which methods may run without a per-call authorization.
#[derive(Clone, Debug, Default)]
pub struct Permissions {
    records: Arc<RwLock<HashMap<String, Vec<Permission>>>>,
}

impl Permissions {
    /// Creates a store with `permitted` granted at the [`WILDCARD_ORIGIN`].
    pub fn new<I, S>(permitted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::default();
        for method in permitted {
            store.permit(method, WILDCARD_ORIGIN);
        }
        store
    }

    /// Grants `method` at `origin`, replacing an existing grant.
    ///
    /// Returns `true` if `method` was not granted at `origin` before.
    pub fn permit(&self, method: impl Into<String>, origin: &str) -> bool {
        let method = method.into();
        let mut records = self.records.write();
        let perms = records.entry(origin.to_string()).or_default();
        let existed = perms.iter().any(|p| p.parent_capability == method);
        perms.retain(|p| p.parent_capability != method);
        debug!(target: "wallet::permissions", %method, origin, "permit");
        perms.push(Permission::new(origin, method));
        !existed
    }

    /// Removes the grant for `method` at `origin`, returns `true` if there was one.
    ///
    /// Grants at the [`WILDCARD_ORIGIN`] are only removed when revoked there.
    pub fn revoke(&self, method: &str, origin: &str) -> bool {
        let mut records = self.records.write();
        let Some(perms) = records.get_mut(origin) else { return false };
        let len = perms.len();
        perms.retain(|p| p.parent_capability != method);
        let removed = perms.len() != len;
        if removed {
            debug!(target: "wallet::permissions", method, origin, "revoke");
        }
        removed
    }

    /// Whether `method` is granted at `origin` or at the [`WILDCARD_ORIGIN`].
    pub fn is_permitted(&self, method: &str, origin: &str) -> bool {
        let records = self.records.read();
        [origin, WILDCARD_ORIGIN].iter().any(|origin| {
            records.get(*origin).is_some_and(|perms| perms.iter().any(|p| p.parent_capability == method))
        })
    }

    /// All grants visible to `origin`, its own first, then the wildcard ones.
    pub fn get(&self, origin: &str) -> Vec<Permission> {
        let records = self.records.read();
        let mut perms = records.get(origin).cloned().unwrap_or_default();
        if origin != WILDCARD_ORIGIN {
            perms.extend(records.get(WILDCARD_ORIGIN).into_iter().flatten().cloned());
        }
        perms
    }
}
