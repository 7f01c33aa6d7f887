use http::{HeaderMap, HeaderName, HeaderValue, Request};

use crate::error::AuthError;

pub const X_AUTH_XPUB: &str = "X-Auth-Xpub";
pub const X_AUTH_KEY: &str = "X-Auth-Key";
pub const X_AUTH_HASH: &str = "X-Auth-Hash";
pub const X_AUTH_NONCE: &str = "X-Auth-Nonce";
pub const X_AUTH_TIME: &str = "X-Auth-Time";
pub const X_AUTH_SIGNATURE: &str = "X-Auth-Signature";

/// Every header this crate may emit.
pub const ALL_AUTH_HEADERS: [&str; 6] = [
    X_AUTH_XPUB,
    X_AUTH_KEY,
    X_AUTH_HASH,
    X_AUTH_NONCE,
    X_AUTH_TIME,
    X_AUTH_SIGNATURE,
];

/// The four companion headers of a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    pub hash: String,
    pub nonce: String,
    pub time: String,
    pub signature: String,
}

/// Headers authenticating one outbound request. Never cached or reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaderSet {
    identity_name: &'static str,
    identity: String,
    signature: Option<SignatureHeaders>,
}

impl AuthHeaderSet {
    pub(crate) fn unsigned(identity_name: &'static str, identity: String) -> Self {
        Self {
            identity_name,
            identity,
            signature: None,
        }
    }

    pub(crate) fn signed(
        identity_name: &'static str,
        identity: String,
        signature: SignatureHeaders,
    ) -> Self {
        Self {
            identity_name,
            identity,
            signature: Some(signature),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn signature(&self) -> Option<&SignatureHeaders> {
        self.signature.as_ref()
    }

    /// Name of the public-key header, `X-Auth-Xpub` or `X-Auth-Key`.
    pub fn identity_name(&self) -> &'static str {
        self.identity_name
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Header names compare case-insensitively, as on the wire.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// One identity header, plus four more when signed. Never zero.
    pub fn header_count(&self) -> usize {
        if self.is_signed() { 5 } else { 1 }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let signature = self.signature.iter().flat_map(|sig| {
            [
                (X_AUTH_HASH, sig.hash.as_str()),
                (X_AUTH_NONCE, sig.nonce.as_str()),
                (X_AUTH_TIME, sig.time.as_str()),
                (X_AUTH_SIGNATURE, sig.signature.as_str()),
            ]
        });
        std::iter::once((self.identity_name, self.identity.as_str())).chain(signature)
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, AuthError> {
        let mut map = HeaderMap::with_capacity(self.header_count());
        for (name, value) in self.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                AuthError::InvalidHeader {
                    name,
                    reason: e.to_string(),
                }
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| AuthError::InvalidHeader {
                name,
                reason: e.to_string(),
            })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    /// Merges the set into `request`.
    ///
    /// Stale auth headers already on the request are removed first, so a
    /// retried request never mixes two signatures. Nothing is written if any
    /// value fails to encode.
    pub fn apply_to<B>(&self, request: &mut Request<B>) -> Result<(), AuthError> {
        let map = self.to_header_map()?;
        let headers = request.headers_mut();
        for name in ALL_AUTH_HEADERS {
            headers.remove(name);
        }
        headers.extend(map);
        Ok(())
    }
}
