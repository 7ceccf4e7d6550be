use crate::utils::{DEV_KEYS, test_wallet};
use headless_wallet::{EventKind, WalletEvent};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

fn counter(wallet: &headless_wallet::HeadlessWallet, kind: EventKind, once: bool) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let listener = move |_: &WalletEvent| {
        c.fetch_add(1, Ordering::SeqCst);
    };
    if once {
        wallet.once(kind, listener);
    } else {
        wallet.on(kind, listener);
    }
    count
}

#[tokio::test(flavor = "multi_thread")]
async fn once_listeners_fire_a_single_time() {
    let (wallet, _) = test_wallet();
    let every = counter(&wallet, EventKind::AccountsChanged, false);
    let once = counter(&wallet, EventKind::AccountsChanged, true);

    wallet.change_accounts([DEV_KEYS[0]]).unwrap();
    wallet.change_accounts(DEV_KEYS).unwrap();

    assert_eq!(every.load(Ordering::SeqCst), 2);
    assert_eq!(once.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn can_unsubscribe() {
    let (wallet, _) = test_wallet();
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let id = wallet.on(EventKind::AccountsChanged, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    wallet.change_accounts(DEV_KEYS).unwrap();
    assert!(wallet.off(EventKind::AccountsChanged, id));
    assert!(!wallet.off(EventKind::AccountsChanged, id));
    wallet.change_accounts(DEV_KEYS).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn listeners_only_see_their_kind() {
    let (wallet, _) = test_wallet();
    let chain = counter(&wallet, EventKind::ChainChanged, false);

    wallet.change_accounts(DEV_KEYS).unwrap();
    assert_eq!(chain.load(Ordering::SeqCst), 0);
    assert_eq!(EventKind::ChainChanged.to_string(), "chainChanged");
    assert_eq!(EventKind::AccountsChanged.to_string(), "accountsChanged");
}
