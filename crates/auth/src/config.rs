use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

fn default_sign_request() -> bool {
    true
}

/// Keys a client is configured with.
///
/// At most one credential is resolved from it; see
/// [`HeaderBuilder::new`](crate::HeaderBuilder::new) for the precedence.
#[derive(Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Extended private key (`xprv…`/`tprv…`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpriv: Option<String>,
    /// Extended public key (`xpub…`/`tpub…`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpub: Option<String>,
    /// Standalone private key, WIF or hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    /// Whether an extended private key signs requests.
    #[serde(default = "default_sign_request")]
    pub sign_request: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            xpriv: None,
            xpub: None,
            access_key: None,
            sign_request: default_sign_request(),
        }
    }
}

impl HeaderConfig {
    pub fn with_xpriv(xpriv: impl Into<String>) -> Self {
        Self {
            xpriv: Some(xpriv.into()),
            ..Self::default()
        }
    }

    pub fn with_xpub(xpub: impl Into<String>) -> Self {
        Self {
            xpub: Some(xpub.into()),
            ..Self::default()
        }
    }

    pub fn with_access_key(access_key: impl Into<String>) -> Self {
        Self {
            access_key: Some(access_key.into()),
            ..Self::default()
        }
    }

    /// Whether any of the three keys is set, blank or not.
    pub fn has_key(&self) -> bool {
        self.xpriv.is_some() || self.xpub.is_some() || self.access_key.is_some()
    }

    pub fn from_json_str(json: &str) -> Result<Self, AuthError> {
        serde_json::from_str(json).map_err(|e| AuthError::Configuration(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AuthError::Configuration(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for HeaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderConfig")
            .field("xpriv", &redacted(&self.xpriv))
            .field("xpub", &self.xpub)
            .field("access_key", &redacted(&self.access_key))
            .field("sign_request", &self.sign_request)
            .finish()
    }
}
