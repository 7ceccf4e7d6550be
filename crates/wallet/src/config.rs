use crate::{chain::Chain, transport::ChainTransport};
use alloy_primitives::ChainId;
use std::{fmt, sync::Arc};

/// The anvil dev chain id
pub const DEFAULT_CHAIN_ID: ChainId = 31337;

/// The default rpc url of a local node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// A callback receiving request log lines when `debug` is enabled.
#[derive(Clone)]
pub struct LogSink(Arc<dyn Fn(&str) + Send + Sync>);

impl LogSink {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn log(&self, line: &str) {
        (self.0)(line)
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LogSink").finish_non_exhaustive()
    }
}

/// Wallet configuration
#[derive(Clone, Debug, Default)]
pub struct WalletConfig {
    /// Hex encoded private keys of the accounts, in order
    pub private_keys: Vec<String>,
    /// Known chains, the first one is active
    pub chains: Vec<Chain>,
    /// Log every request
    pub debug: bool,
    /// Receives request log lines in addition to `tracing`
    pub logger: Option<LogSink>,
    /// Methods that never need an authorization
    pub permitted: Vec<String>,
    /// Used to reach every chain instead of an http client per chain rpc url
    pub transport: Option<Arc<dyn ChainTransport>>,
}

impl WalletConfig {
    /// A single local dev chain and no accounts.
    pub fn test() -> Self {
        Self { chains: vec![Chain::new(DEFAULT_CHAIN_ID, DEFAULT_RPC_URL)], ..Default::default() }
    }

    /// Sets the private keys
    #[must_use]
    pub fn with_private_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.private_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the chains, the first one becomes active
    #[must_use]
    pub fn with_chains(mut self, chains: Vec<Chain>) -> Self {
        self.chains = chains;
        self
    }

    /// Appends a chain
    #[must_use]
    pub fn with_chain(mut self, chain: Chain) -> Self {
        self.chains.push(chain);
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the request log sink
    #[must_use]
    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.logger = Some(LogSink::new(logger));
        self
    }

    /// Sets the methods that are granted upfront
    #[must_use]
    pub fn with_permitted<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permitted = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Routes every chain call through `transport`
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn ChainTransport>) -> Self {
        self.transport = Some(transport);
        self
    }
}
