//! Copilot chat completions client.
//!
//! This module is only available when the `copilot` feature is enabled.

use async_trait::async_trait;
use ragway_core::Credentials;
use serde::Deserialize;
use tracing::{debug, error};

use crate::client::{CompletionClient, CompletionRequest};
use crate::error::{ModelError, Result};
use crate::lines::{LineStream, line_stream};

/// The default Copilot API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.githubcopilot.com";

/// The default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// A [`CompletionClient`] for the Copilot `/chat/completions` endpoint.
///
/// The response body (server-sent `data:` lines) is handed back untouched,
/// one line per stream item.
#[derive(Debug, Clone)]
pub struct CopilotCompletionClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for CopilotCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CopilotCompletionClient {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new(), base_url: DEFAULT_BASE_URL.into() }
    }

    /// Share an existing HTTP client (connection pool) with this client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point the client at another API base URL (no trailing `/chat/completions`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl CompletionClient for CopilotCompletionClient {
    async fn stream_complete(
        &self,
        credentials: &Credentials,
        request: CompletionRequest,
    ) -> Result<LineStream> {
        debug!(
            model = %request.model,
            message_count = request.messages.len(),
            stream = request.stream,
            "requesting chat completion"
        );

        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&credentials.token)
            .json(&request);
        if !credentials.integration_id.is_empty() {
            http_request = http_request.header("Copilot-Integration-Id", &credentials.integration_id);
        }

        let response = http_request.send().await.map_err(|e| {
            error!(error = %e, "chat completion request failed");
            ModelError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(%status, "chat completion API error");
            return Err(ModelError::Api { status: status.as_u16(), message });
        }

        Ok(line_stream(response.bytes_stream()))
    }
}
