//! Error types for the `ragway-auth` crate.

use thiserror::Error;

/// A signature that could not be decoded into an `(R, S)` pair.
///
/// A signature that decodes cleanly but does not match the payload is not an
/// error: verification simply returns `false`.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The signature header is not valid standard base64.
    #[error("signature is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not a single DER `SEQUENCE { r INTEGER, s INTEGER }`,
    /// carry trailing bytes, or hold integers outside the curve's scalar range.
    #[error("signature is not a well-formed DER (r, s) structure: {0}")]
    Der(String),
}

/// Errors raised while obtaining the caller's public key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key listing could not be fetched.
    #[error("failed to fetch public key: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The key listing endpoint answered with a non-success status.
    #[error("failed to fetch public key: HTTP {0}")]
    Status(u16),

    /// The key listing body was not the expected JSON document.
    #[error("failed to decode public key listing: {0}")]
    Decode(String),

    /// The listing contained no key flagged as current.
    #[error("could not find current public key")]
    NoCurrentKey,

    /// The key material is not a PEM-encoded P-256 public key.
    #[error("invalid public key: {0}")]
    InvalidKey(String),
}

/// A convenience result type for key loading.
pub type Result<T> = std::result::Result<T, KeyError>;
