use std::sync::Arc;

use http::{Method, Request};
use tracing::debug;

use crate::config::HeaderConfig;
use crate::credential::{Authenticate, Credential};
use crate::error::AuthError;
use crate::headers::AuthHeaderSet;
use crate::signing::{NonceSource, PayloadCanonicalizer, Sha256Canonicalizer, SystemNonceSource};

fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Single entry point for the HTTP layer, hiding which credential is active.
#[derive(Clone)]
pub struct HeaderBuilder {
    credential: Credential,
    nonces: Arc<dyn NonceSource>,
    canonicalizer: Arc<dyn PayloadCanonicalizer>,
}

impl HeaderBuilder {
    /// Resolves exactly one credential from `config`.
    ///
    /// Precedence: extended private key, extended public key, access key.
    /// Blank values count as absent.
    pub fn new(config: Option<&HeaderConfig>) -> Result<Self, AuthError> {
        let config = config.ok_or(AuthError::MissingHeaderConfiguration)?;

        let credential = if let Some(xpriv) = configured(&config.xpriv) {
            Credential::from_xpriv_with_signing(xpriv, config.sign_request)?
        } else if let Some(xpub) = configured(&config.xpub) {
            Credential::from_xpub(xpub)?
        } else if let Some(access_key) = configured(&config.access_key) {
            Credential::from_access_key(access_key)?
        } else {
            return Err(AuthError::MissingKeys);
        };

        debug!(credential = %credential.kind(), signing = credential.is_signing(), "resolved credential");
        Ok(Self::from_credential(credential))
    }

    pub fn from_credential(credential: Credential) -> Self {
        Self {
            credential,
            nonces: Arc::new(SystemNonceSource),
            canonicalizer: Arc::new(Sha256Canonicalizer),
        }
    }

    pub fn with_nonce_source(mut self, nonces: Arc<dyn NonceSource>) -> Self {
        self.nonces = nonces;
        self
    }

    /// Swaps the payload layout, e.g. to match a different server verifier.
    pub fn with_canonicalizer(mut self, canonicalizer: Arc<dyn PayloadCanonicalizer>) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Headers for a request without a body (GET, body-less DELETE).
    pub fn build_without_body(&self) -> Result<AuthHeaderSet, AuthError> {
        self.build("")
    }

    /// Headers for an arbitrary body; the body is hashed as given.
    pub fn build(&self, body: &str) -> Result<AuthHeaderSet, AuthError> {
        self.build_for(&Method::POST, body.as_bytes())
    }

    /// Headers for a concrete method. GET-class methods hash an empty body.
    pub fn build_for(&self, method: &Method, body: &[u8]) -> Result<AuthHeaderSet, AuthError> {
        self.credential
            .headers_with(method, body, self.nonces.as_ref(), self.canonicalizer.as_ref())
    }
}

impl Authenticate for HeaderBuilder {
    fn authenticate<B: AsRef<[u8]>>(&self, request: &mut Request<B>) -> Result<(), AuthError> {
        let headers = self.build_for(request.method(), request.body().as_ref())?;
        headers.apply_to(request)
    }
}

impl std::fmt::Debug for HeaderBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderBuilder")
            .field("credential", &self.credential)
            .field("canonicalizer", &self.canonicalizer.name())
            .finish_non_exhaustive()
    }
}
