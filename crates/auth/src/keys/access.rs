use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

const SECRET_KEY_LEN: usize = 32;
const WIF_MAINNET: u8 = 0x80;
const WIF_TESTNET: u8 = 0xef;
const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// Standalone secp256k1 key pair, outside any HD hierarchy.
#[derive(Clone)]
pub struct EcKeyPair {
    private_key: SigningKey,
    public_key: VerifyingKey,
}

impl EcKeyPair {
    pub fn from_signing_key(private_key: SigningKey) -> Self {
        let public_key = *private_key.verifying_key();
        Self { private_key, public_key }
    }

    /// Decodes a private key given as WIF or as 64 hex characters.
    ///
    /// WIF is attempted first; the hex attempt only runs when WIF fails, and
    /// both failures are reported together.
    pub fn parse(encoded: &str) -> Result<Self, AuthError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(AuthError::MissingPrivateKey);
        }

        let wif_error = match decode_wif(encoded) {
            Ok(key) => return Ok(Self::from_signing_key(key)),
            Err(e) => e,
        };
        match decode_hex(encoded) {
            Ok(key) => Ok(Self::from_signing_key(key)),
            Err(hex_error) => Err(AuthError::InvalidPrivateKeyEncoding {
                wif: wif_error,
                hex: hex_error,
            }),
        }
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.private_key
    }

    /// Compressed public key (33 bytes).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.to_encoded_point(true).as_bytes().to_vec()
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// Identifier the wallet service files this access key under: hex
    /// SHA-256 of the compressed public key hex string.
    pub fn access_key_id(&self) -> String {
        hex::encode(Sha256::digest(self.public_key_hex().as_bytes()))
    }
}

impl fmt::Debug for EcKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

fn decode_wif(encoded: &str) -> Result<SigningKey, String> {
    let payload = bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|e| e.to_string())?;

    let (version, rest) = payload.split_first().ok_or("empty payload")?;
    if *version != WIF_MAINNET && *version != WIF_TESTNET {
        return Err(format!("unknown version byte 0x{version:02x}"));
    }
    let secret = match rest.len() {
        SECRET_KEY_LEN => rest,
        n if n == SECRET_KEY_LEN + 1 && rest[SECRET_KEY_LEN] == WIF_COMPRESSED_FLAG => {
            &rest[..SECRET_KEY_LEN]
        }
        n => return Err(format!("unexpected payload length {n}")),
    };
    SigningKey::from_slice(secret).map_err(|e| format!("invalid secret scalar: {e}"))
}

fn decode_hex(encoded: &str) -> Result<SigningKey, String> {
    let bytes = hex::decode(encoded).map_err(|e| e.to_string())?;
    if bytes.len() != SECRET_KEY_LEN {
        return Err(format!("expected {SECRET_KEY_LEN} bytes, got {}", bytes.len()));
    }
    SigningKey::from_slice(&bytes).map_err(|e| format!("invalid secret scalar: {e}"))
}
