//! # ragway-auth
//!
//! Authenticity checks for inbound gateway requests.
//!
//! Callers sign the raw request body with an ECDSA P-256 key and send the
//! base64-encoded DER signature alongside it. [`SignatureVerifier`] checks
//! that signature against the caller's published public key, which is
//! loaded once at startup through [`fetch_public_key`] or
//! [`public_key_from_pem`].
//!
//! ```rust,ignore
//! use ragway_auth::{SignatureVerifier, fetch_public_key, DEFAULT_PUBLIC_KEY_URL};
//!
//! let key = fetch_public_key(&reqwest::Client::new(), DEFAULT_PUBLIC_KEY_URL).await?;
//! let verifier = SignatureVerifier::new(key);
//! if !verifier.verify(&body, &signature_header)? {
//!     // reject with 401
//! }
//! ```

pub mod error;
pub mod keys;
pub mod signature;

pub use error::{KeyError, SignatureError};
pub use keys::{DEFAULT_PUBLIC_KEY_URL, fetch_public_key, public_key_from_pem};
pub use p256::ecdsa::VerifyingKey;
pub use signature::{SignatureVerifier, verify_payload};
