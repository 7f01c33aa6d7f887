#![allow(dead_code)]

use http::Method;
use k256::ecdsa::{Signature, VerifyingKey, signature::hazmat::PrehashVerifier};
use wallet_auth::AuthHeaderSet;
use wallet_auth::headers::{X_AUTH_KEY, X_AUTH_XPUB};
use wallet_auth::keys::HdPublicKey;
use wallet_auth::signing::{PayloadCanonicalizer, Sha256Canonicalizer, SigningContext};

// BIP-32 test vector 1, chain m.
pub const XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
pub const XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

// Private key 1, compressed WIF.
pub const ACCESS_KEY_WIF: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";
pub const ACCESS_KEY_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000001";
pub const ACCESS_KEY_PUBLIC: &str =
    "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

fn verifying_key(headers: &AuthHeaderSet) -> VerifyingKey {
    let public_key = match headers.identity_name() {
        X_AUTH_XPUB => HdPublicKey::parse(headers.identity()).unwrap().public_key_bytes(),
        X_AUTH_KEY => hex::decode(headers.identity()).unwrap(),
        other => panic!("unexpected identity header {other}"),
    };
    VerifyingKey::from_sec1_bytes(&public_key).unwrap()
}

/// Server-side check: rebuild the payload from what went over the wire and
/// verify the signature against the advertised public key.
pub fn verify(headers: &AuthHeaderSet, method: &Method, body: &[u8]) -> bool {
    let Some(sig) = headers.signature() else {
        return false;
    };
    let Ok(time) = sig.time.parse::<u64>() else {
        return false;
    };
    let context = SigningContext::from_parts(method, body, sig.nonce.clone(), time);
    let payload = Sha256Canonicalizer
        .canonicalize(headers.identity(), &context)
        .unwrap();
    if payload.body_hash != sig.hash {
        return false;
    }
    let Ok(bytes) = hex::decode(&sig.signature) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&bytes) else {
        return false;
    };
    verifying_key(headers)
        .verify_prehash(&payload.digest, &signature)
        .is_ok()
}
