use std::fmt;

use http::{Method, Request};
use k256::ecdsa::SigningKey;
use tracing::debug;

use crate::error::AuthError;
use crate::headers::{AuthHeaderSet, X_AUTH_KEY, X_AUTH_XPUB};
use crate::keys::{EcKeyPair, ExtendedKey, HdPrivateKey, HdPublicKey, KeyMaterial};
use crate::signing::{
    NonceSource, PayloadCanonicalizer, Secp256k1Signer, Sha256Canonicalizer, SigningContext,
    SystemNonceSource, sign_context,
};

/// Something that can stamp an outbound request with authentication headers.
///
/// The HTTP layer calls this right before sending. On error the request is
/// left untouched and must not be sent.
pub trait Authenticate {
    fn authenticate<B: AsRef<[u8]>>(&self, request: &mut Request<B>) -> Result<(), AuthError>;
}

impl<T: Authenticate + ?Sized> Authenticate for std::sync::Arc<T> {
    fn authenticate<B: AsRef<[u8]>>(&self, request: &mut Request<B>) -> Result<(), AuthError> {
        (**self).authenticate(request)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialKind {
    Xpub,
    Xpriv,
    AccessKey,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CredentialKind::Xpub => "xpub",
            CredentialKind::Xpriv => "xpriv",
            CredentialKind::AccessKey => "access-key",
        })
    }
}

/// The identity a client authenticates with. Built once, never mutated.
///
/// Whether a credential signs is decided here at construction time and is
/// never re-evaluated per request.
#[derive(Clone)]
pub enum Credential {
    /// Identifies by extended public key, never signs.
    XpubOnly { xpub: HdPublicKey },
    /// Identifies by the neutered key, signs when `sign_request` is set.
    XprivSigning {
        xpriv: HdPrivateKey,
        xpub: HdPublicKey,
        sign_request: bool,
    },
    /// Standalone key pair, always signs.
    AccessKeySigning { key_pair: EcKeyPair },
}

impl Credential {
    pub fn from_xpub(xpub: &str) -> Result<Self, AuthError> {
        Ok(Credential::XpubOnly {
            xpub: HdPublicKey::parse(xpub)?,
        })
    }

    /// Signing is on by default.
    pub fn from_xpriv(xpriv: &str) -> Result<Self, AuthError> {
        Self::from_xpriv_with_signing(xpriv, true)
    }

    pub fn from_xpriv_with_signing(xpriv: &str, sign_request: bool) -> Result<Self, AuthError> {
        let xpriv = HdPrivateKey::parse(xpriv)?;
        let xpub = xpriv.to_public();
        Ok(Credential::XprivSigning {
            xpriv,
            xpub,
            sign_request,
        })
    }

    /// Accepts WIF or hex; see [`EcKeyPair::parse`].
    pub fn from_access_key(private_key: &str) -> Result<Self, AuthError> {
        Ok(Credential::AccessKeySigning {
            key_pair: EcKeyPair::parse(private_key)?,
        })
    }

    /// `sign_request` only matters for extended private keys.
    pub fn from_key_material(material: KeyMaterial, sign_request: bool) -> Self {
        match material {
            KeyMaterial::Extended(ExtendedKey::Public(xpub)) => Credential::XpubOnly { xpub },
            KeyMaterial::Extended(ExtendedKey::Private(xpriv)) => {
                let xpub = xpriv.to_public();
                Credential::XprivSigning {
                    xpriv,
                    xpub,
                    sign_request,
                }
            }
            KeyMaterial::EcKeyPair(key_pair) => Credential::AccessKeySigning { key_pair },
        }
    }

    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::XpubOnly { .. } => CredentialKind::Xpub,
            Credential::XprivSigning { .. } => CredentialKind::Xpriv,
            Credential::AccessKeySigning { .. } => CredentialKind::AccessKey,
        }
    }

    pub fn is_signing(&self) -> bool {
        match self {
            Credential::XpubOnly { .. } => false,
            Credential::XprivSigning { sign_request, .. } => *sign_request,
            Credential::AccessKeySigning { .. } => true,
        }
    }

    /// Name of the public-key header this credential emits.
    pub fn identity_header(&self) -> &'static str {
        match self {
            Credential::XpubOnly { .. } | Credential::XprivSigning { .. } => X_AUTH_XPUB,
            Credential::AccessKeySigning { .. } => X_AUTH_KEY,
        }
    }

    /// Value of the public-key header: the xpub string, or the compressed
    /// public key in hex.
    pub fn identity(&self) -> String {
        match self {
            Credential::XpubOnly { xpub } | Credential::XprivSigning { xpub, .. } => {
                xpub.to_string()
            }
            Credential::AccessKeySigning { key_pair } => key_pair.public_key_hex(),
        }
    }

    /// Server-side id of an access key; `None` for HD credentials.
    pub fn access_key_id(&self) -> Option<String> {
        match self {
            Credential::AccessKeySigning { key_pair } => Some(key_pair.access_key_id()),
            _ => None,
        }
    }

    fn signing_key(&self) -> Result<&SigningKey, AuthError> {
        match self {
            Credential::XpubOnly { .. } => Err(AuthError::PublicKeyOnly),
            Credential::XprivSigning { xpriv, .. } => Ok(xpriv.signing_key()),
            Credential::AccessKeySigning { key_pair } => Ok(key_pair.signing_key()),
        }
    }

    /// Computes the header set for one request with the default nonce
    /// source and canonicalization.
    pub fn headers(&self, method: &Method, body: &[u8]) -> Result<AuthHeaderSet, AuthError> {
        self.headers_with(method, body, &SystemNonceSource, &Sha256Canonicalizer)
    }

    pub fn headers_with(
        &self,
        method: &Method,
        body: &[u8],
        nonces: &dyn NonceSource,
        canonicalizer: &dyn PayloadCanonicalizer,
    ) -> Result<AuthHeaderSet, AuthError> {
        let identity_name = self.identity_header();
        let identity = self.identity();

        if !self.is_signing() {
            debug!(credential = %self.kind(), %method, "built unsigned auth headers");
            return Ok(AuthHeaderSet::unsigned(identity_name, identity));
        }

        let signing_key = self.signing_key()?;
        let context = SigningContext::new(method, body, nonces);
        let signature = sign_context(
            &identity,
            &context,
            canonicalizer,
            &Secp256k1Signer::new(signing_key),
        )?;

        debug!(
            credential = %self.kind(),
            %method,
            canonicalization = canonicalizer.name(),
            "built signed auth headers"
        );
        Ok(AuthHeaderSet::signed(identity_name, identity, signature))
    }
}

impl Authenticate for Credential {
    fn authenticate<B: AsRef<[u8]>>(&self, request: &mut Request<B>) -> Result<(), AuthError> {
        let headers = self.headers(request.method(), request.body().as_ref())?;
        headers.apply_to(request)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind())
            .field("identity", &self.identity())
            .field("signing", &self.is_signing())
            .finish()
    }
}
