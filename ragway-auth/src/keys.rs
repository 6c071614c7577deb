//! Loading the caller's ECDSA public key.

use p256::ecdsa::VerifyingKey;
use p256::pkcs8::DecodePublicKey;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::error::{KeyError, Result};

/// Where GitHub publishes the keys Copilot signs agent requests with.
pub const DEFAULT_PUBLIC_KEY_URL: &str = "https://api.github.com/meta/public_keys/copilot_api";

#[derive(Debug, Deserialize)]
struct PublicKeyListing {
    public_keys: Vec<PublicKeyEntry>,
}

#[derive(Debug, Deserialize)]
struct PublicKeyEntry {
    key: String,
    #[serde(default)]
    key_identifier: Option<String>,
    #[serde(default)]
    is_current: bool,
}

/// Fetch the key listing at `url` and parse the entry flagged as current.
///
/// # Errors
///
/// Returns [`KeyError`] if the request fails, the status is not a success,
/// the body is not a key listing, no key is current, or the current key is
/// not a PEM-encoded P-256 public key.
pub async fn fetch_public_key(client: &reqwest::Client, url: &str) -> Result<VerifyingKey> {
    debug!(url, "fetching public key listing");

    let response = client
        .get(url)
        .header(USER_AGENT, concat!("ragway/", env!("CARGO_PKG_VERSION")))
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        error!(url, %status, "public key listing request failed");
        return Err(KeyError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    let listing: PublicKeyListing =
        serde_json::from_str(&body).map_err(|e| KeyError::Decode(e.to_string()))?;

    let current =
        listing.public_keys.into_iter().find(|k| k.is_current).ok_or(KeyError::NoCurrentKey)?;

    info!(key_identifier = current.key_identifier.as_deref().unwrap_or("-"), "loaded public key");
    public_key_from_pem(&current.key)
}

/// Parse a PEM-encoded SubjectPublicKeyInfo holding a P-256 key.
///
/// Literal `\n` escape sequences are accepted in place of newlines, since
/// that is how the key listing transports them.
pub fn public_key_from_pem(pem: &str) -> Result<VerifyingKey> {
    let pem = pem.replace("\\n", "\n");
    VerifyingKey::from_public_key_pem(pem.trim())
        .map_err(|e| KeyError::InvalidKey(e.to_string()))
}
