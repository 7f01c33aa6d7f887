use k256::ecdsa::{Signature, SigningKey, signature::hazmat::PrehashSigner};

use super::signer::PayloadSigner;
use crate::error::AuthError;

/// Length of a compact `r || s` signature.
pub const SIGNATURE_LEN: usize = 64;

/// RFC 6979 deterministic ECDSA over secp256k1.
///
/// Borrows the private key for the lifetime of one request; it can only be
/// built from private material.
pub struct Secp256k1Signer<'k> {
    signing_key: &'k SigningKey,
}

impl<'k> Secp256k1Signer<'k> {
    pub fn new(signing_key: &'k SigningKey) -> Self {
        Self { signing_key }
    }
}

impl PayloadSigner for Secp256k1Signer<'_> {
    fn sign_digest(&self, digest: &[u8]) -> Result<Vec<u8>, AuthError> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| AuthError::Signing(format!("secp256k1 sign_prehash failed: {e}")))?;
        // `sign_prehash` already yields low-S; this only pins the guarantee
        // the verifier relies on.
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_bytes().to_vec())
    }
}
