mod nonce;
mod payload;
mod secp256k1;
mod signer;

pub use nonce::{NONCE_LEN, NonceSource, SeededNonceSource, SystemNonceSource};
pub use payload::{
    CanonicalPayload, PayloadCanonicalizer, Sha256Canonicalizer, SigningContext, carries_body,
    unix_millis,
};
pub use secp256k1::{SIGNATURE_LEN, Secp256k1Signer};
pub use signer::PayloadSigner;

use crate::error::AuthError;
use crate::headers::SignatureHeaders;

/// Runs the signing pipeline for one request.
///
/// 1. Canonicalizes the context under `identity`.
/// 2. Signs the digest.
/// 3. Returns the four signature headers, all computed from the same
///    nonce and timestamp.
pub fn sign_context(
    identity: &str,
    context: &SigningContext<'_>,
    canonicalizer: &dyn PayloadCanonicalizer,
    signer: &dyn PayloadSigner,
) -> Result<SignatureHeaders, AuthError> {
    let payload = canonicalizer.canonicalize(identity, context)?;
    let signature = signer.sign_digest(&payload.digest)?;

    Ok(SignatureHeaders {
        hash: payload.body_hash,
        nonce: context.nonce().to_string(),
        time: context.time().to_string(),
        signature: hex::encode(signature),
    })
}
