use crate::{
    chain::Chain,
    config::{DEFAULT_CHAIN_ID, DEFAULT_RPC_URL, WalletConfig},
    serde_helpers::parse_chain_id,
    server::WalletServer,
    wallet::HeadlessWallet,
};
use clap::Parser;
use eyre::{Result, WrapErr};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::info;

/// Runs the `headless-wallet` command line interface.
pub fn run() -> Result<()> {
    init_tracing();
    let args = WalletArgs::parse();
    tokio::runtime::Builder::new_multi_thread().enable_all().build()?.block_on(args.run())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet=info".into()),
        )
        .try_init();
}

#[derive(Clone, Debug, Parser)]
#[command(name = "headless-wallet", version, about = "A mock EIP-1193 wallet for dapp tests")]
pub struct WalletArgs {
    /// Private key of an account, repeat for more accounts. The first one is the default sender.
    #[arg(
        long = "private-key",
        short = 'k',
        value_name = "KEY",
        env = "WALLET_PRIVATE_KEYS",
        value_delimiter = ','
    )]
    pub private_keys: Vec<String>,

    /// A chain as `<CHAIN_ID>=<RPC_URL>`, repeat for more chains. The first one is active.
    #[arg(long = "chain", value_name = "ID=URL", value_parser = parse_chain)]
    pub chains: Vec<Chain>,

    /// A method that never needs an authorization, e.g. `eth_requestAccounts`.
    #[arg(long = "permit", value_name = "METHOD")]
    pub permitted: Vec<String>,

    /// The host to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// The port to listen on.
    #[arg(long, short, default_value_t = 8546)]
    pub port: u16,

    /// Log every request.
    #[arg(long)]
    pub debug: bool,
}

impl WalletArgs {
    pub fn into_wallet_config(self) -> WalletConfig {
        let chains = if self.chains.is_empty() {
            vec![Chain::new(DEFAULT_CHAIN_ID, DEFAULT_RPC_URL)]
        } else {
            self.chains
        };
        WalletConfig::default()
            .with_private_keys(self.private_keys)
            .with_chains(chains)
            .with_permitted(self.permitted)
            .with_debug(self.debug)
    }

    /// Starts the server and runs until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(self.host, self.port);
        let wallet = HeadlessWallet::new(self.into_wallet_config())
            .wrap_err("failed to create the wallet")?;
        for (idx, address) in wallet.accounts().iter().enumerate() {
            info!(target: "wallet", "account ({idx}): {address}");
        }

        let server = WalletServer::bind(wallet, addr)
            .await
            .wrap_err_with(|| format!("failed to listen on {addr}"))?;
        println!("Listening on {}", server.url());

        tokio::signal::ctrl_c().await?;
        info!(target: "wallet", "received shutdown signal, shutting down");
        server.stop().await?;
        Ok(())
    }
}

/// Parses `<CHAIN_ID>=<RPC_URL>`, the chain id in decimal or `0x` hex.
fn parse_chain(s: &str) -> Result<Chain, String> {
    let (id, url) = s.split_once('=').ok_or_else(|| format!("expected <ID>=<URL>, got {s}"))?;
    let id = parse_chain_id(&serde_json::Value::String(id.to_string()))
        .ok_or_else(|| format!("invalid chain id {id}"))?;
    Ok(Chain::new(id, url))
}
