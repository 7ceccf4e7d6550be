//! # headless-wallet
//!
//! A mock [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) wallet for end-to-end dapp tests.
//!
//! Requests run through a chain of [`Middleware`]. Unsafe calls, e.g. `eth_sendTransaction`, are
//! held back until the test authorizes or rejects them, see [`HeadlessWallet::authorize`].

pub mod accounts;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod middleware;
pub mod permissions;
pub mod queue;
pub mod serde_helpers;
pub mod server;
pub mod transport;

mod wallet;

#[cfg(feature = "cmd")]
pub mod cmd;

pub use chain::Chain;
pub use config::{DEFAULT_CHAIN_ID, DEFAULT_RPC_URL, LogSink, WalletConfig};
pub use engine::{Engine, Middleware, Next};
pub use error::{PrivateKeyError, WalletError};
pub use events::{EventKind, ListenerId, WalletEvent};
pub use headless_rpc as rpc;
pub use middleware::RequestKind;
pub use queue::RequestInfo;
pub use server::WalletServer;
pub use transport::{ChainTransport, HttpTransport};
pub use wallet::HeadlessWallet;
