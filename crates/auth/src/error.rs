/// Errors raised while resolving credentials or authenticating a request.
///
/// The first group surfaces at client construction and is fatal to the
/// client. `PublicKeyOnly`, `Signing` and `InvalidHeader` are fatal to a
/// single request only; the request must not be sent.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing extended key")]
    MissingExtendedKey,
    #[error("missing private key")]
    MissingPrivateKey,
    #[error("missing header configuration")]
    MissingHeaderConfiguration,
    #[error("missing keys: configure an extended private key, an extended public key or an access key")]
    MissingKeys,
    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),
    #[error("invalid private key encoding: not WIF ({wif}), not hex ({hex})")]
    InvalidPrivateKeyEncoding { wif: String, hex: String },
    #[error("failed to read header configuration: {0}")]
    Configuration(String),
    #[error("extended key carries no private material")]
    PublicKeyOnly,
    #[error("failed to sign request: {0}")]
    Signing(String),
    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },
}

impl AuthError {
    /// Whether the error belongs to client construction rather than to a
    /// single outbound request.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            AuthError::PublicKeyOnly | AuthError::Signing(_) | AuthError::InvalidHeader { .. }
        )
    }
}
