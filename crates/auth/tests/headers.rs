mod common;

use std::collections::HashSet;
use std::sync::Arc;

use http::Method;
use wallet_auth::headers::{
    X_AUTH_HASH, X_AUTH_KEY, X_AUTH_NONCE, X_AUTH_SIGNATURE, X_AUTH_TIME, X_AUTH_XPUB,
};
use wallet_auth::signing::{NonceSource, SIGNATURE_LEN, SeededNonceSource, unix_millis};
use wallet_auth::{AuthError, Credential, HeaderBuilder, HeaderConfig};

use common::{ACCESS_KEY_HEX, ACCESS_KEY_PUBLIC, ACCESS_KEY_WIF, XPRV, XPUB, verify};

const SIGNED_HEADERS: [&str; 4] = [X_AUTH_HASH, X_AUTH_NONCE, X_AUTH_TIME, X_AUTH_SIGNATURE];
const METHODS: [Method; 5] = [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

// ── Credential states ────────────────────────────────────────────────

#[test]
fn xpriv_signing_emits_five_headers_on_every_method() {
    let credential = Credential::from_xpriv(XPRV).unwrap();
    for method in METHODS {
        let headers = credential.headers(&method, b"{}").unwrap();
        assert_eq!(headers.iter().count(), 5, "{method}");
        assert_eq!(headers.get(X_AUTH_XPUB), Some(XPUB));
        for name in SIGNED_HEADERS {
            assert!(headers.get(name).is_some(), "{method} missing {name}");
        }
    }
}

#[test]
fn xpriv_without_signing_emits_xpub_only() {
    let credential = Credential::from_xpriv_with_signing(XPRV, false).unwrap();
    for method in METHODS {
        let headers = credential.headers(&method, b"{}").unwrap();
        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![X_AUTH_XPUB]);
    }
}

#[test]
fn access_key_always_signs() {
    for encoded in [ACCESS_KEY_WIF, ACCESS_KEY_HEX] {
        let credential = Credential::from_access_key(encoded).unwrap();
        for method in METHODS {
            let headers = credential.headers(&method, b"").unwrap();
            assert!(headers.is_signed());
            assert_eq!(headers.get(X_AUTH_KEY), Some(ACCESS_KEY_PUBLIC));
            assert!(headers.get(X_AUTH_XPUB).is_none());
        }
    }
}

#[test]
fn xpub_credential_is_never_signed() {
    let credential = Credential::from_xpub(XPUB).unwrap();
    let headers = credential.headers(&Method::POST, b"{\"a\":1}").unwrap();
    assert!(!headers.is_signed());
    assert_eq!(headers.get(X_AUTH_XPUB), Some(XPUB));
}

// ── Payload rules ────────────────────────────────────────────────────

#[test]
fn get_hash_ignores_attached_body() {
    let credential = Credential::from_access_key(ACCESS_KEY_HEX).unwrap();
    let plain = credential.headers(&Method::GET, b"").unwrap();
    let with_body = credential.headers(&Method::GET, b"{\"sneaky\":true}").unwrap();
    assert_eq!(plain.get(X_AUTH_HASH), with_body.get(X_AUTH_HASH));

    // The server hashes nothing for GET, whatever the client attached.
    assert!(verify(&with_body, &Method::GET, b""));
}

#[test]
fn post_hash_depends_on_body() {
    let credential = Credential::from_access_key(ACCESS_KEY_HEX).unwrap();
    let a = credential.headers(&Method::POST, b"a").unwrap();
    let b = credential.headers(&Method::POST, b"b").unwrap();
    assert_ne!(a.get(X_AUTH_HASH), b.get(X_AUTH_HASH));
}

#[test]
fn nonces_are_fresh_per_call() {
    let credential = Credential::from_xpriv(XPRV).unwrap();
    let nonces: HashSet<String> = (0..200)
        .map(|_| {
            credential
                .headers(&Method::POST, b"same")
                .unwrap()
                .get(X_AUTH_NONCE)
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(nonces.len(), 200);
}

#[test]
fn encodings_are_fixed_width_lowercase_hex() {
    let credential = Credential::from_access_key(ACCESS_KEY_WIF).unwrap();
    let headers = credential.headers(&Method::POST, b"x").unwrap();
    let is_lower_hex = |s: &str| s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'));

    let sig = headers.signature().unwrap();
    assert_eq!(sig.hash.len(), 64);
    assert_eq!(sig.nonce.len(), 64);
    assert_eq!(sig.signature.len(), SIGNATURE_LEN * 2);
    assert!(is_lower_hex(&sig.hash) && is_lower_hex(&sig.nonce) && is_lower_hex(&sig.signature));
}

#[test]
fn timestamp_is_unix_millis() {
    let before = unix_millis();
    let headers = Credential::from_access_key(ACCESS_KEY_HEX)
        .unwrap()
        .headers(&Method::GET, b"")
        .unwrap();
    let after = unix_millis();
    let time: u64 = headers.get(X_AUTH_TIME).unwrap().parse().unwrap();
    assert!(before <= time && time <= after);
}

// ── Signature round trip ─────────────────────────────────────────────

#[test]
fn signatures_verify_for_every_signing_credential() {
    let body = br#"{"key":"value"}"#;
    for credential in [
        Credential::from_xpriv(XPRV).unwrap(),
        Credential::from_access_key(ACCESS_KEY_WIF).unwrap(),
    ] {
        let headers = credential.headers(&Method::POST, body).unwrap();
        assert!(verify(&headers, &Method::POST, body), "{credential:?}");
    }
}

#[test]
fn tampered_body_fails_verification() {
    let credential = Credential::from_xpriv(XPRV).unwrap();
    let body = br#"{"key":"value"}"#;
    let headers = credential.headers(&Method::POST, body).unwrap();

    let mut tampered = body.to_vec();
    tampered[2] ^= 0x01;
    assert!(!verify(&headers, &Method::POST, &tampered));
}

#[test]
fn replayed_headers_with_new_body_fail_verification() {
    let credential = Credential::from_access_key(ACCESS_KEY_HEX).unwrap();
    let headers = credential.headers(&Method::PUT, b"original").unwrap();
    assert!(verify(&headers, &Method::PUT, b"original"));
    assert!(!verify(&headers, &Method::PUT, b"replaced"));
}

// ── Construction errors ──────────────────────────────────────────────

#[test]
fn empty_keys_produce_missing_key_errors() {
    assert!(matches!(Credential::from_xpub(""), Err(AuthError::MissingExtendedKey)));
    assert!(matches!(Credential::from_xpriv(""), Err(AuthError::MissingExtendedKey)));
    assert!(matches!(Credential::from_access_key(""), Err(AuthError::MissingPrivateKey)));
}

#[test]
fn malformed_access_key_reports_both_attempts() {
    let err = Credential::from_access_key("zz-definitely-not-a-key").unwrap_err();
    match &err {
        AuthError::InvalidPrivateKeyEncoding { wif, hex } => {
            assert!(!wif.is_empty());
            assert!(!hex.is_empty());
        }
        other => panic!("expected encoding error, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("WIF") && message.contains("hex"));
}

#[test]
fn unparseable_extended_keys_are_rejected() {
    assert!(matches!(
        Credential::from_xpub("xpub-garbage"),
        Err(AuthError::InvalidExtendedKey(_))
    ));
    assert!(matches!(
        Credential::from_xpriv("xprv-garbage"),
        Err(AuthError::InvalidExtendedKey(_))
    ));
}

// ── Fixed xpriv scenario ─────────────────────────────────────────────

#[test]
fn fixed_xpriv_post_only_varies_in_signature_headers() {
    let builder = HeaderBuilder::new(Some(&HeaderConfig::with_xpriv(XPRV))).unwrap();
    let first = builder.build(r#"{"key":"value"}"#).unwrap();
    let second = builder.build(r#"{"key":"value"}"#).unwrap();

    assert_eq!(first.get(X_AUTH_XPUB), Some(XPUB));
    assert_eq!(second.get(X_AUTH_XPUB), Some(XPUB));
    // Same body, same hash; fresh nonce, hence a fresh signature.
    assert_eq!(first.get(X_AUTH_HASH), second.get(X_AUTH_HASH));
    assert_ne!(first.get(X_AUTH_NONCE), second.get(X_AUTH_NONCE));
    assert_ne!(first.get(X_AUTH_SIGNATURE), second.get(X_AUTH_SIGNATURE));
}

#[test]
fn seeded_nonce_source_is_used_by_builder() {
    let builder = HeaderBuilder::new(Some(&HeaderConfig::with_access_key(ACCESS_KEY_HEX)))
        .unwrap()
        .with_nonce_source(Arc::new(SeededNonceSource::new([4u8; 32])));
    let reference = SeededNonceSource::new([4u8; 32]);
    let expected_prefix = reference.next_nonce()[..48].to_string();

    let headers = builder.build_without_body().unwrap();
    assert!(headers.get(X_AUTH_NONCE).unwrap().starts_with(&expected_prefix));
    assert!(verify(&headers, &Method::POST, b""));
}
