use crate::error::AuthError;

/// Signs the digest of a canonical request payload.
///
/// Implementations are sync, signing is CPU-bound. Only types holding
/// private material implement this trait.
pub trait PayloadSigner: Send + Sync {
    /// Sign a prehashed digest. Returns raw signature bytes.
    fn sign_digest(&self, digest: &[u8]) -> Result<Vec<u8>, AuthError>;
}
