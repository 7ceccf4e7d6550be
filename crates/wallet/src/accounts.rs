//! The local signers the wallet holds.

use crate::error::PrivateKeyError;
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use parking_lot::RwLock;
use std::sync::Arc;

/// Parses a hex encoded private key, with or without `0x` prefix.
pub fn parse_private_key(key: &str) -> Result<PrivateKeySigner, PrivateKeyError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(PrivateKeyError::Empty);
    }
    Ok(key.parse()?)
}

/// Parses every key, failing on the first invalid one.
pub fn parse_private_keys<I, S>(keys: I) -> Result<Vec<PrivateKeySigner>, PrivateKeyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter().map(|key| parse_private_key(key.as_ref())).collect()
}

/// The ordered set of accounts, replaceable as a whole.
#[derive(Clone, Debug, Default)]
pub struct Accounts {
    signers: Arc<RwLock<Vec<PrivateKeySigner>>>,
}

impl Accounts {
    pub fn new(signers: Vec<PrivateKeySigner>) -> Self {
        Self { signers: Arc::new(RwLock::new(signers)) }
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.signers.read().iter().map(|s| s.address()).collect()
    }

    /// The signer for `address`, if the wallet holds it.
    pub fn signer(&self, address: Address) -> Option<PrivateKeySigner> {
        self.signers.read().iter().find(|s| s.address() == address).cloned()
    }

    /// The first account, the default sender.
    pub fn first(&self) -> Option<PrivateKeySigner> {
        self.signers.read().first().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.read().is_empty()
    }

    /// Replaces all accounts, returning the new addresses.
    pub fn replace(&self, signers: Vec<PrivateKeySigner>) -> Vec<Address> {
        let addresses = signers.iter().map(|s| s.address()).collect();
        *self.signers.write() = signers;
        addresses
    }
}
