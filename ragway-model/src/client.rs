//! Completion client trait.

use async_trait::async_trait;
use ragway_core::{ChatMessage, Credentials};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lines::LineStream;

/// A chat completion request, serialized as-is to OpenAI-style providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl CompletionRequest {
    /// A request asking the provider to stream its answer.
    pub fn streaming(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self { model: model.into(), messages, stream: true }
    }
}

/// A provider that answers a conversation with a line-delimited stream.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `request` and return the response body as a stream of lines.
    ///
    /// Returns once the provider has accepted the request; the body is read
    /// lazily as the stream is polled.
    async fn stream_complete(
        &self,
        credentials: &Credentials,
        request: CompletionRequest,
    ) -> Result<LineStream>;
}
