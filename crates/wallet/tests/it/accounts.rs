use crate::utils::{DEV_ADDRESSES, DEV_KEYS, test_wallet};
use headless_wallet::{EventKind, WalletEvent};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;

fn record(wallet: &headless_wallet::HeadlessWallet, kind: EventKind) -> Arc<Mutex<Vec<WalletEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    wallet.on(kind, move |event| sink.lock().push(event.clone()));
    events
}

#[tokio::test(flavor = "multi_thread")]
async fn accounts_are_hidden_until_connected() {
    let (wallet, _) = test_wallet();
    assert_eq!(wallet.accounts(), DEV_ADDRESSES);
    assert_eq!(wallet.request("eth_accounts", json!([])).await.unwrap(), json!([]));

    let changed = record(&wallet, EventKind::AccountsChanged);
    let connected = record(&wallet, EventKind::Connect);

    let authorized = wallet.authorize("eth_requestAccounts");
    let accounts = wallet.request("eth_requestAccounts", json!([])).await.unwrap();
    authorized.await.unwrap();
    assert_eq!(accounts, json!(DEV_ADDRESSES));
    assert_eq!(wallet.request("eth_accounts", json!([])).await.unwrap(), json!(DEV_ADDRESSES));

    assert_eq!(*changed.lock(), vec![WalletEvent::AccountsChanged(DEV_ADDRESSES.to_vec())]);
    assert_eq!(*connected.lock(), vec![WalletEvent::Connect { chain_id: 31337 }]);
}

#[tokio::test(flavor = "multi_thread")]
async fn reconnecting_does_not_emit_connect() {
    let (wallet, _) = test_wallet();
    let connected = record(&wallet, EventKind::Connect);

    for _ in 0..2 {
        let authorized = wallet.authorize("eth_requestAccounts");
        wallet.request("eth_requestAccounts", json!([])).await.unwrap();
        authorized.await.unwrap();
    }
    assert_eq!(connected.lock().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn can_change_accounts() {
    let (wallet, _) = test_wallet();
    let changed = record(&wallet, EventKind::AccountsChanged);

    let addresses = wallet.change_accounts([DEV_KEYS[1]]).unwrap();
    assert_eq!(addresses, vec![DEV_ADDRESSES[1]]);
    assert_eq!(wallet.accounts(), vec![DEV_ADDRESSES[1]]);
    assert_eq!(*changed.lock(), vec![WalletEvent::AccountsChanged(vec![DEV_ADDRESSES[1]])]);

    // an invalid key leaves the accounts untouched
    assert!(wallet.change_accounts(["0xnotakey"]).is_err());
    assert!(wallet.change_accounts([""]).is_err());
    assert_eq!(wallet.accounts(), vec![DEV_ADDRESSES[1]]);
}

#[tokio::test(flavor = "multi_thread")]
async fn can_request_and_revoke_permissions() {
    let (wallet, _) = test_wallet();

    let authorized = wallet.authorize("wallet_requestPermissions");
    let granted = wallet
        .request("wallet_requestPermissions", json!([{ "eth_accounts": {} }]))
        .await
        .unwrap();
    authorized.await.unwrap();
    assert_eq!(granted, json!([{ "parentCapability": "eth_accounts" }]));

    let permissions = wallet.request("wallet_getPermissions", json!([])).await.unwrap();
    let capabilities = permissions
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["parentCapability"].clone())
        .collect::<Vec<_>>();
    assert_eq!(capabilities, vec![json!("eth_accounts")]);
    assert_eq!(wallet.request("eth_accounts", json!([])).await.unwrap(), json!(DEV_ADDRESSES));

    let changed = record(&wallet, EventKind::AccountsChanged);
    let revoked = wallet
        .request("wallet_revokePermissions", json!([{ "eth_accounts": {} }]))
        .await
        .unwrap();
    assert_eq!(revoked, Value::Null);
    assert_eq!(wallet.request("eth_accounts", json!([])).await.unwrap(), json!([]));
    assert_eq!(wallet.request("wallet_getPermissions", json!([])).await.unwrap(), json!([]));
    assert_eq!(*changed.lock(), vec![WalletEvent::AccountsChanged(vec![])]);
}

#[tokio::test(flavor = "multi_thread")]
async fn denies_permission_request_without_accounts() {
    let (wallet, _) = test_wallet();

    let authorized = wallet.authorize("wallet_requestPermissions");
    let err = wallet
        .request("wallet_requestPermissions", json!([{ "eth_chainId": {} }]))
        .await
        .unwrap_err();
    authorized.await.unwrap();
    assert_eq!(err.code.code(), 4001);
    assert_eq!(wallet.request("eth_accounts", json!([])).await.unwrap(), json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn permitted_accounts_are_visible_immediately() {
    let (wallet, _) = crate::utils::test_wallet_with(
        headless_wallet::WalletConfig::test().with_permitted(["eth_accounts"]),
    );

    assert_eq!(wallet.request("eth_accounts", json!([])).await.unwrap(), json!(DEV_ADDRESSES));
    assert_eq!(wallet.pending_request_count(None), 0);
}
