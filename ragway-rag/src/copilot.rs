//! Copilot embedding provider using the Copilot embeddings API.
//!
//! This module is only available when the `copilot` feature is enabled.

use async_trait::async_trait;
use ragway_core::{Credentials, Embedding};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Copilot API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.githubcopilot.com";

/// The default model for Copilot embeddings.
pub const DEFAULT_MODEL: &str = "copilot-text-embedding-ada-002";

const PROVIDER: &str = "Copilot";

/// An [`EmbeddingProvider`] backed by the Copilot `/embeddings` endpoint.
///
/// Authenticates with the caller's token and forwards the caller's
/// integration id, so one provider serves every request.
///
/// # Example
///
/// ```rust,ignore
/// use ragway_rag::copilot::CopilotEmbeddingProvider;
///
/// let provider = CopilotEmbeddingProvider::new().with_model("text-embedding-3-small");
/// let embedding = provider.embed(&credentials, "hello world").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CopilotEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl Default for CopilotEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CopilotEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    /// Share an existing HTTP client (connection pool) with this provider.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point the provider at another API base URL (no trailing `/embeddings`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn error(message: String) -> RagError {
        RagError::EmbeddingError { provider: PROVIDER.into(), message }
    }
}

// ── Copilot API request/response types ─────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Embedding,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for CopilotEmbeddingProvider {
    async fn embed(&self, credentials: &Credentials, text: &str) -> Result<Embedding> {
        debug!(provider = PROVIDER, text_len = text.len(), model = %self.model, "embedding text");

        let mut request = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&credentials.token)
            .json(&EmbeddingRequest { model: &self.model, input: [text] });
        if !credentials.integration_id.is_empty() {
            request = request.header("Copilot-Integration-Id", &credentials.integration_id);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            Self::error(format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(Self::error(format!("API returned {status}: {detail}")));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            Self::error(format!("failed to parse response: {e}"))
        })?;

        embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Self::error("no embeddings found in response".into()))
    }
}
