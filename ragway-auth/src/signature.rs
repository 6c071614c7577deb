//! ECDSA P-256 payload signature verification.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use der::asn1::UintRef;
use der::{Decode, Reader, SliceReader};
use p256::FieldBytes;
use p256::ecdsa::signature::DigestVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::error::SignatureError;

/// Verifies that request payloads were signed by the holder of a known key.
///
/// The verifier is immutable and cheap to share between request handlers.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Verify `signature` over the exact bytes of `payload`.
    ///
    /// See [`verify_payload`].
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<bool, SignatureError> {
        verify_payload(payload, signature, &self.key)
    }
}

/// Verify a base64-encoded DER ECDSA signature over the SHA-256 digest of
/// `payload`.
///
/// `payload` must be the bytes exactly as received on the wire; a parsed and
/// re-serialized body will not verify.
///
/// # Errors
///
/// Returns [`SignatureError`] when the signature is not base64 or not a DER
/// `SEQUENCE` of two `INTEGER`s with nothing after it. A well-formed pair that
/// does not match, including one whose integers are out of range for P-256,
/// yields `Ok(false)`.
pub fn verify_payload(
    payload: &[u8],
    signature: &str,
    key: &VerifyingKey,
) -> Result<bool, SignatureError> {
    let der = STANDARD.decode(signature)?;
    let (r, s) = decode_pair(&der).map_err(|e| SignatureError::Der(e.to_string()))?;

    let (Some(r), Some(s)) = (field_bytes(r), field_bytes(s)) else {
        return Ok(false);
    };
    let Ok(signature) = Signature::from_scalars(r, s) else {
        return Ok(false);
    };

    let digest = Sha256::new_with_prefix(payload);
    Ok(key.verify_digest(digest, &signature).is_ok())
}

/// Decode `SEQUENCE { r INTEGER, s INTEGER }`, rejecting trailing bytes.
fn decode_pair(bytes: &[u8]) -> der::Result<(UintRef<'_>, UintRef<'_>)> {
    let mut reader = SliceReader::new(bytes)?;
    let pair = reader.sequence(|seq| Ok((UintRef::decode(seq)?, UintRef::decode(seq)?)))?;
    reader.finish(pair)
}

/// Left-pad a big-endian integer to the P-256 field size; `None` if it is wider.
fn field_bytes(int: UintRef<'_>) -> Option<FieldBytes> {
    let bytes = int.as_bytes();
    let mut out = FieldBytes::default();
    let offset = out.len().checked_sub(bytes.len())?;
    out[offset..].copy_from_slice(bytes);
    Some(out)
}
