use std::fmt;
use std::str::FromStr;

use bip32::{ExtendedKey as RawExtendedKey, Prefix, XPrv, XPub};
use k256::ecdsa::SigningKey;

use crate::error::AuthError;

/// Private/public prefix pairs, so a derived public key re-serializes on the
/// network its private key came from.
const PREFIX_PAIRS: [(Prefix, Prefix); 4] = [
    (Prefix::XPRV, Prefix::XPUB),
    (Prefix::TPRV, Prefix::TPUB),
    (Prefix::YPRV, Prefix::YPUB),
    (Prefix::ZPRV, Prefix::ZPUB),
];

fn public_prefix(private: Prefix) -> Prefix {
    PREFIX_PAIRS
        .iter()
        .find(|(prv, _)| *prv == private)
        .map(|(_, pb)| *pb)
        .unwrap_or(Prefix::XPUB)
}

fn parse_raw(encoded: &str) -> Result<RawExtendedKey, AuthError> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(AuthError::MissingExtendedKey);
    }
    RawExtendedKey::from_str(encoded).map_err(|e| AuthError::InvalidExtendedKey(e.to_string()))
}

/// HD node carrying public material only.
#[derive(Clone)]
pub struct HdPublicKey {
    key: XPub,
    prefix: Prefix,
}

impl HdPublicKey {
    pub fn parse(encoded: &str) -> Result<Self, AuthError> {
        let raw = parse_raw(encoded)?;
        let prefix = raw.prefix;
        if !prefix.is_public() {
            return Err(AuthError::InvalidExtendedKey(format!(
                "expected an extended public key, got prefix {prefix}"
            )));
        }
        let key = XPub::try_from(raw).map_err(|e| AuthError::InvalidExtendedKey(e.to_string()))?;
        Ok(Self { key, prefix })
    }

    /// Compressed SEC1 encoding of the node's public point.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.key.public_key().to_encoded_point(true).as_bytes().to_vec()
    }
}

impl fmt::Display for HdPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key.to_string(self.prefix))
    }
}

impl fmt::Debug for HdPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HdPublicKey").field(&self.to_string()).finish()
    }
}

impl PartialEq for HdPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for HdPublicKey {}

/// HD node carrying a private scalar.
#[derive(Clone)]
pub struct HdPrivateKey {
    key: XPrv,
    prefix: Prefix,
}

impl HdPrivateKey {
    pub fn parse(encoded: &str) -> Result<Self, AuthError> {
        let raw = parse_raw(encoded)?;
        let prefix = raw.prefix;
        if !prefix.is_private() {
            return Err(AuthError::InvalidExtendedKey(format!(
                "expected an extended private key, got prefix {prefix}"
            )));
        }
        let key = XPrv::try_from(raw).map_err(|e| AuthError::InvalidExtendedKey(e.to_string()))?;
        Ok(Self { key, prefix })
    }

    /// Neuters the node. Always yields a new value; `self` is untouched.
    pub fn to_public(&self) -> HdPublicKey {
        HdPublicKey {
            key: self.key.public_key(),
            prefix: public_prefix(self.prefix),
        }
    }

    pub fn signing_key(&self) -> &SigningKey {
        self.key.private_key()
    }
}

impl fmt::Debug for HdPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdPrivateKey")
            .field("xpub", &self.to_public().to_string())
            .finish_non_exhaustive()
    }
}

/// An HD node, private or public.
#[derive(Clone, Debug)]
pub enum ExtendedKey {
    Private(HdPrivateKey),
    Public(HdPublicKey),
}

impl ExtendedKey {
    /// Parses either flavour, dispatching on the version prefix.
    pub fn parse(encoded: &str) -> Result<Self, AuthError> {
        let raw = parse_raw(encoded)?;
        let prefix = raw.prefix;
        if prefix.is_private() {
            let key = XPrv::try_from(raw).map_err(|e| AuthError::InvalidExtendedKey(e.to_string()))?;
            Ok(ExtendedKey::Private(HdPrivateKey { key, prefix }))
        } else {
            let key = XPub::try_from(raw).map_err(|e| AuthError::InvalidExtendedKey(e.to_string()))?;
            Ok(ExtendedKey::Public(HdPublicKey { key, prefix }))
        }
    }

    pub fn to_public(&self) -> HdPublicKey {
        match self {
            ExtendedKey::Private(xpriv) => xpriv.to_public(),
            ExtendedKey::Public(xpub) => xpub.clone(),
        }
    }
}
