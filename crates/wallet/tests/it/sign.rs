use crate::utils::{DEV_ADDRESSES, test_wallet};
use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, Signature, address, hex};
use serde_json::{Value, json};

fn signature(value: Value) -> Signature {
    let bytes = hex::decode(value.as_str().unwrap()).unwrap();
    assert_eq!(bytes.len(), 65);
    Signature::from_raw(&bytes).unwrap()
}

fn mail() -> Value {
    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" }
            ],
            "Person": [
                { "name": "name", "type": "string" },
                { "name": "wallet", "type": "address" }
            ],
            "Mail": [
                { "name": "from", "type": "Person" },
                { "name": "to", "type": "Person" },
                { "name": "contents", "type": "string" }
            ]
        },
        "primaryType": "Mail",
        "domain": {
            "name": "Ether Mail",
            "version": "1",
            "chainId": 1,
            "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
        },
        "message": {
            "from": { "name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826" },
            "to": { "name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB" },
            "contents": "Hello, Bob!"
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn can_personal_sign() {
    let (wallet, _) = test_wallet();
    wallet.permit("personal_sign");

    let sig = wallet
        .request("personal_sign", json!(["0x68656c6c6f", DEV_ADDRESSES[1]]))
        .await
        .unwrap();
    let recovered = signature(sig.clone()).recover_address_from_msg(b"hello").unwrap();
    assert_eq!(recovered, DEV_ADDRESSES[1]);

    // plain text signs the same bytes
    let text = wallet.request("personal_sign", json!(["hello", DEV_ADDRESSES[1]])).await.unwrap();
    assert_eq!(text, sig);
}

#[tokio::test(flavor = "multi_thread")]
async fn can_sign_typed_data() {
    let (wallet, _) = test_wallet();
    wallet.permit("eth_signTypedData_v4");
    wallet.permit("eth_signTypedData_v3");

    let hash = serde_json::from_value::<TypedData>(mail()).unwrap().eip712_signing_hash().unwrap();

    let sig = wallet
        .request("eth_signTypedData_v4", json!([DEV_ADDRESSES[0], mail()]))
        .await
        .unwrap();
    assert_eq!(signature(sig.clone()).recover_address_from_prehash(&hash).unwrap(), DEV_ADDRESSES[0]);

    // data given as a JSON string
    let v3 = wallet
        .request("eth_signTypedData_v3", json!([DEV_ADDRESSES[0], mail().to_string()]))
        .await
        .unwrap();
    assert_eq!(v3, sig);
}

#[tokio::test(flavor = "multi_thread")]
async fn refuses_to_sign_for_unknown_account() {
    let (wallet, _) = test_wallet();
    wallet.permit("personal_sign");

    const STRANGER: Address = address!("0x0000000000000000000000000000000000000001");
    let err = wallet.request("personal_sign", json!(["0x68656c6c6f", STRANGER])).await.unwrap_err();
    assert_eq!(err.code.code(), 4100);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejects_malformed_sign_params() {
    let (wallet, _) = test_wallet();
    wallet.permit("personal_sign");
    wallet.permit("eth_signTypedData_v4");

    let err = wallet.request("personal_sign", json!(["0x68656c6c6f"])).await.unwrap_err();
    assert_eq!(err.code.code(), -32602);

    let err = wallet
        .request("eth_signTypedData_v4", json!([DEV_ADDRESSES[0], { "types": {} }]))
        .await
        .unwrap_err();
    assert_eq!(err.code.code(), -32602);
}
