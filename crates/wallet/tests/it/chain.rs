use crate::utils::test_wallet_with;
use headless_wallet::{Chain, EventKind, WalletConfig, WalletError, WalletEvent};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;

fn two_chains() -> WalletConfig {
    WalletConfig::default()
        .with_chain(Chain::new(31337, "http://127.0.0.1:8545"))
        .with_chain(Chain::new(1337, "http://127.0.0.1:8546").with_name("Second"))
}

#[tokio::test(flavor = "multi_thread")]
async fn reports_active_chain() {
    let (wallet, _) = test_wallet_with(two_chains());

    assert!(wallet.is_connected());
    assert_eq!(wallet.chain().unwrap().id, 31337);
    assert_eq!(wallet.chain_ids(), vec![31337, 1337]);
    assert_eq!(wallet.request("eth_chainId", json!([])).await.unwrap(), json!("0x7a69"));
    assert_eq!(wallet.request("net_version", json!([])).await.unwrap(), json!(31337));
}

#[tokio::test(flavor = "multi_thread")]
async fn can_switch_chain() {
    let (wallet, _) = test_wallet_with(two_chains());
    let changed = Arc::new(Mutex::new(Vec::new()));
    let sink = changed.clone();
    wallet.on(EventKind::ChainChanged, move |event| sink.lock().push(event.payload()));

    let authorized = wallet.authorize("wallet_switchEthereumChain");
    let res = wallet
        .request("wallet_switchEthereumChain", json!([{ "chainId": "0x539" }]))
        .await
        .unwrap();
    authorized.await.unwrap();
    assert_eq!(res, Value::Null);
    assert_eq!(wallet.request("eth_chainId", json!([])).await.unwrap(), json!("0x539"));

    // switching to the active chain is a no-op
    wallet.switch_chain(1337).unwrap();
    assert_eq!(*changed.lock(), vec![json!("0x539")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn switching_to_unknown_chain_fails() {
    let (wallet, _) = test_wallet_with(two_chains());

    assert!(matches!(wallet.switch_chain(5), Err(WalletError::ChainDisconnected(5))));

    wallet.permit("wallet_switchEthereumChain");
    let err = wallet
        .request("wallet_switchEthereumChain", json!([{ "chainId": "0x5" }]))
        .await
        .unwrap_err();
    assert_eq!(err.code.code(), 4901);
    assert_eq!(wallet.chain().unwrap().id, 31337);
}

#[tokio::test(flavor = "multi_thread")]
async fn can_add_chain() {
    let (wallet, _) = test_wallet_with(two_chains());
    wallet.permit("wallet_addEthereumChain");

    let res = wallet
        .request(
            "wallet_addEthereumChain",
            json!([{
                "chainId": "0xaa36a7",
                "chainName": "Sepolia",
                "rpcUrls": ["https://rpc.sepolia.org"],
                "nativeCurrency": { "name": "Sepolia Ether", "symbol": "ETH", "decimals": 18 }
            }]),
        )
        .await
        .unwrap();
    assert_eq!(res, Value::Null);

    let added = wallet.chains().into_iter().find(|c| c.id == 11155111).unwrap();
    assert_eq!(added.rpc_url, "https://rpc.sepolia.org");
    assert_eq!(added.name.as_deref(), Some("Sepolia"));
    // adding never moves away from the active chain
    assert_eq!(wallet.chain().unwrap().id, 31337);

    // re-adding replaces the known chain
    wallet.add_chain(Chain::new(11155111, "http://localhost:1234"));
    let chains = wallet.chains();
    assert_eq!(chains.iter().filter(|c| c.id == 11155111).count(), 1);
    assert_eq!(chains.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn disconnected_without_chains() {
    let (wallet, _) = test_wallet_with(WalletConfig::default());

    assert!(!wallet.is_connected());
    let err = wallet.request("eth_chainId", json!([])).await.unwrap_err();
    assert_eq!(err.code.code(), 4900);
    let err = wallet.request("eth_blockNumber", json!([])).await.unwrap_err();
    assert_eq!(err.code.code(), 4900);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    wallet.once(EventKind::ChainChanged, move |event| sink.lock().push(event.clone()));

    // the first chain added to a disconnected wallet becomes active
    wallet.add_chain(Chain::new(10, "http://localhost:9545"));
    assert!(wallet.is_connected());
    assert_eq!(wallet.request("eth_chainId", json!([])).await.unwrap(), json!("0xa"));
    assert_eq!(*events.lock(), vec![WalletEvent::ChainChanged(10)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn authorized_add_keeps_active_chain() {
    let (wallet, _) =
        test_wallet_with(WalletConfig::default().with_chain(Chain::new(1337, "http://127.0.0.1:8545")));
    let changed = Arc::new(Mutex::new(Vec::new()));
    let sink = changed.clone();
    wallet.on(EventKind::ChainChanged, move |event| sink.lock().push(event.clone()));

    let req = tokio::spawn({
        let wallet = wallet.clone();
        async move {
            wallet
                .request("wallet_addEthereumChain", json!([{ "chainId": "0x53a", "rpcUrls": [] }]))
                .await
        }
    });
    crate::utils::wait_for_pending(&wallet, "wallet_addEthereumChain", 1).await;
    assert_eq!(wallet.pending_request_count(Some("wallet_addEthereumChain")), 1);

    wallet.authorize("wallet_addEthereumChain").await.unwrap();
    req.await.unwrap().unwrap();

    assert_eq!(wallet.chain_ids(), vec![1337, 1338]);
    assert_eq!(wallet.chain().unwrap().id, 1337);
    assert!(changed.lock().is_empty());
}
