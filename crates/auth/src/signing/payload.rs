use std::time::{SystemTime, UNIX_EPOCH};

use http::Method;
use sha2::{Digest, Sha256};

use super::nonce::NonceSource;
use crate::error::AuthError;

/// Whether a request made with `method` contributes its body to the hash.
///
/// GET-class methods carry no meaningful body, so their payload body is
/// always the empty string.
pub fn carries_body(method: &Method) -> bool {
    ![Method::GET, Method::HEAD, Method::OPTIONS, Method::TRACE].contains(method)
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Per-request inputs to the signature. Built once, never reused.
#[derive(Debug)]
pub struct SigningContext<'a> {
    body: &'a [u8],
    nonce: String,
    time: u64,
}

impl<'a> SigningContext<'a> {
    /// Captures a fresh nonce and the current time.
    pub fn new(method: &Method, body: &'a [u8], nonces: &dyn NonceSource) -> Self {
        Self::from_parts(method, body, nonces.next_nonce(), unix_millis())
    }

    pub fn from_parts(method: &Method, body: &'a [u8], nonce: String, time: u64) -> Self {
        let body: &'a [u8] = if carries_body(method) { body } else { &[] };
        Self {
            body,
            nonce,
            time,
        }
    }

    /// The body as it enters the hash (empty for GET-class methods).
    pub fn body(&self) -> &[u8] {
        self.body
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn time(&self) -> u64 {
        self.time
    }
}

/// The exact bytes that get digested and signed for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPayload {
    /// Lowercase hex body hash, sent as `X-Auth-Hash`.
    pub body_hash: String,
    /// Message whose digest is signed.
    pub message: Vec<u8>,
    /// Digest handed to the signer.
    pub digest: Vec<u8>,
}

/// Turns a signing context into the payload the server's verifier expects.
///
/// The canonicalizer owns both message layout and hashing, so a verifier
/// with a different layout only needs a different implementation here.
pub trait PayloadCanonicalizer: Send + Sync {
    /// `identity` is the value of the public-key header (`X-Auth-Xpub` or
    /// `X-Auth-Key`).
    fn canonicalize(
        &self,
        identity: &str,
        context: &SigningContext<'_>,
    ) -> Result<CanonicalPayload, AuthError>;

    /// Format name (e.g. "sha256").
    fn name(&self) -> &str;
}

/// `identity || hex(sha256(body)) || nonce || time`, digested with SHA-256.
///
/// Fields are concatenated without separators; `time` is rendered in
/// decimal milliseconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Canonicalizer;

impl PayloadCanonicalizer for Sha256Canonicalizer {
    fn canonicalize(
        &self,
        identity: &str,
        context: &SigningContext<'_>,
    ) -> Result<CanonicalPayload, AuthError> {
        let body_hash = hex::encode(Sha256::digest(context.body()));
        let message =
            format!("{identity}{body_hash}{}{}", context.nonce(), context.time()).into_bytes();
        let digest = Sha256::digest(&message).to_vec();
        Ok(CanonicalPayload {
            body_hash,
            message,
            digest,
        })
    }

    fn name(&self) -> &str {
        "sha256"
    }
}
