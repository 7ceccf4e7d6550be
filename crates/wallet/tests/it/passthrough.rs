use crate::utils::{DEV_ADDRESSES, test_wallet};
use headless_wallet::{Chain, WalletConfig, middleware::PASSTHROUGH_METHODS};
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn forwards_read_methods_to_chain() {
    let (wallet, transport) = test_wallet();

    assert_eq!(wallet.request("eth_blockNumber", json!([])).await.unwrap(), json!("0x2a"));
    let balance = wallet
        .request("eth_getBalance", json!([DEV_ADDRESSES[0], "latest"]))
        .await
        .unwrap();
    assert_eq!(balance, json!("0xde0b6b3a7640000"));

    assert_eq!(
        transport.calls(),
        vec![
            ("eth_blockNumber".to_string(), json!([])),
            ("eth_getBalance".to_string(), json!([DEV_ADDRESSES[0], "latest"])),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn relays_node_errors_unchanged() {
    let (wallet, _) = test_wallet();

    let err = wallet.request("eth_call", json!([{ "to": DEV_ADDRESSES[1] }])).await.unwrap_err();
    assert_eq!(err.code.code(), 3);
    assert_eq!(err.message, "execution reverted");
    assert_eq!(err.data, Some(json!("0x08c379a0")));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_methods_are_unsupported() {
    let (wallet, transport) = test_wallet();

    for method in ["eth_subscribe", "eth_sign", "debug_traceTransaction"] {
        let err = wallet.request(method, json!([])).await.unwrap_err();
        assert_eq!(err.code.code(), 4200);
        assert_eq!(err.data, Some(json!(method)));
    }
    assert!(transport.calls().is_empty());
}

#[test]
fn passthrough_methods_are_safe() {
    for method in PASSTHROUGH_METHODS {
        assert!(!headless_wallet::middleware::is_unsafe(method), "{method}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_rpc_url_fails_forwarded_calls() {
    let wallet = headless_wallet::HeadlessWallet::new(
        WalletConfig::default().with_chain(Chain::new(1, "not a url")),
    )
    .unwrap();
    let err = wallet.request("eth_blockNumber", json!([])).await.unwrap_err();
    assert_eq!(err.code.code(), -32603);

    // the wallet itself still answers
    assert_eq!(wallet.request("eth_chainId", json!([])).await.unwrap(), json!("0x1"));
}
