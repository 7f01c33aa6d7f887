//! Per-request authentication for a remote wallet service.
//!
//! Every outbound call carries a stateless proof of identity: the public key
//! header (`X-Auth-Xpub` or `X-Auth-Key`) and, for signing credentials, a
//! body hash, nonce, timestamp and secp256k1 signature.

pub mod builder;
pub mod config;
pub mod credential;
pub mod error;
pub mod headers;
pub mod keys;
pub mod middleware;
pub mod signing;

pub use builder::HeaderBuilder;
pub use config::HeaderConfig;
pub use credential::{Authenticate, Credential, CredentialKind};
pub use error::AuthError;
pub use headers::AuthHeaderSet;
pub use middleware::{AuthLayer, AuthService};
