//! An HTTP front for the wallet: JSON-RPC at `/` and the control API under `/api`.

mod api;
mod handler;

pub use api::{ApiResponse, Pending};
pub use handler::handle_request;

use crate::wallet::HeadlessWallet;
use axum::{Router, routing::post};
use std::{io, net::SocketAddr};
use tokio::{
    net::{TcpListener, ToSocketAddrs},
    sync::oneshot,
    task::JoinHandle,
};
use tracing::info;

/// Builds the router serving `wallet`.
pub fn router(wallet: HeadlessWallet) -> Router {
    Router::new().route("/", post(handler::handle)).nest("/api", api::router()).with_state(wallet)
}

/// A running wallet server.
#[derive(Debug)]
pub struct WalletServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<io::Result<()>>,
}

impl WalletServer {
    /// Binds to `addr` and serves `wallet` on a background task.
    pub async fn bind(wallet: HeadlessWallet, addr: impl ToSocketAddrs) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown, rx) = oneshot::channel::<()>();

        let app = router(wallet);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = rx.await;
                })
                .await
        });

        info!(target: "wallet::server", "listening on {addr}");
        Ok(Self { addr, shutdown: Some(shutdown), handle })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// The `http://` url of the JSON-RPC endpoint.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shuts down gracefully and waits for the server task.
    pub async fn stop(mut self) -> io::Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.wait().await
    }

    /// Waits until the server task exits.
    pub async fn wait(self) -> io::Result<()> {
        self.handle.await.map_err(io::Error::other)?
    }
}
