//! The `headless-wallet` CLI: serves a mock EIP-1193 wallet over HTTP.

fn main() {
    if let Err(err) = headless_wallet::cmd::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
