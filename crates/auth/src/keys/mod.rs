mod access;
mod extended;

pub use access::EcKeyPair;
pub use extended::{ExtendedKey, HdPrivateKey, HdPublicKey};

/// Key material a credential is built from.
///
/// Values are never mutated once parsed; deriving a public key always
/// produces a new value. Only private variants carry a `SigningKey`, so a
/// public-only node has nothing to hand the signer.
#[derive(Clone, Debug)]
pub enum KeyMaterial {
    Extended(ExtendedKey),
    EcKeyPair(EcKeyPair),
}

impl From<ExtendedKey> for KeyMaterial {
    fn from(key: ExtendedKey) -> Self {
        KeyMaterial::Extended(key)
    }
}

impl From<EcKeyPair> for KeyMaterial {
    fn from(pair: EcKeyPair) -> Self {
        KeyMaterial::EcKeyPair(pair)
    }
}
