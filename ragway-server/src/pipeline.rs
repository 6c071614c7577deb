//! The authenticate → embed → retrieve → augment → stream pipeline.

use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use ragway_auth::SignatureVerifier;
use ragway_core::{ChatMessage, ChatRequest, Credentials};
use ragway_model::{CompletionClient, CompletionRequest, LineStream};
use ragway_rag::{CorpusSource, Document, EmbeddingProvider, LazyCorpus};
use tokio::io::AsyncWrite;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ServerConfig};
use crate::error::PipelineError;
use crate::forward::forward_lines;

/// Instruction placed ahead of the retrieved document in the grounding message.
pub const GROUNDING_PREAMBLE: &str = "You are a helpful assistant that replies to user messages.  \
     Use the following context when responding to a message.\nContext: ";

/// The `system` message that grounds the conversation in `document`.
pub fn grounding_message(document: &Document) -> ChatMessage {
    ChatMessage::system(format!("{GROUNDING_PREAMBLE}{}", document.content))
}

/// A request as received at the HTTP boundary, before any parsing.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    /// The body bytes exactly as received; the signature covers these.
    pub payload: Bytes,
    /// Base64 DER signature of `payload`.
    pub signature: String,
    /// Upstream credentials for the embedding and completion providers.
    pub credentials: Credentials,
}

/// Orchestrates one request from signature check to streamed answer.
///
/// Holds the corpus for its whole lifetime: the corpus is built by the first
/// authenticated request and shared by every later one.
pub struct CompletionPipeline {
    verifier: SignatureVerifier,
    corpus: LazyCorpus,
    embedder: Arc<dyn EmbeddingProvider>,
    completions: Arc<dyn CompletionClient>,
    config: ServerConfig,
}

impl CompletionPipeline {
    /// Create a new [`CompletionPipelineBuilder`].
    pub fn builder() -> CompletionPipelineBuilder {
        CompletionPipelineBuilder::default()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn corpus(&self) -> &LazyCorpus {
        &self.corpus
    }

    /// Run the whole pipeline, writing the answer to `sink`.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare) and [`forward_lines`].
    pub async fn respond<W>(&self, request: &InboundRequest, sink: &mut W) -> Result<(), PipelineError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let lines = self.prepare(request).await?;
        forward_lines(lines, sink).await?;
        Ok(())
    }

    /// Run every step up to and including opening the provider stream.
    ///
    /// Splitting here lets the HTTP layer choose a status code before the
    /// first byte of the answer is sent.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::BadRequest`] for an undecodable signature or body
    /// - [`PipelineError::Unauthorized`] for a signature that does not match
    /// - [`PipelineError::Internal`] for anything that fails afterwards
    pub async fn prepare(&self, request: &InboundRequest) -> Result<LineStream, PipelineError> {
        self.verify(&request.payload, &request.signature)?;

        let chat: ChatRequest = serde_json::from_slice(&request.payload)
            .map_err(|e| PipelineError::BadRequest(format!("failed to unmarshal request: {e}")))?;

        let messages = self.augment(chat, &request.credentials).await?;

        let completion_request = CompletionRequest::streaming(&self.config.chat_model, messages);
        let credentials = match &self.config.completion_integration_id {
            Some(id) => request.credentials.with_integration_id(id),
            None => request.credentials.clone(),
        };

        let lines = self
            .completions
            .stream_complete(&credentials, completion_request)
            .await
            .context("failed to get chat completions stream")?;
        Ok(lines)
    }

    /// Check `signature` against the raw `payload`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::BadRequest`] if the signature cannot be decoded,
    /// [`PipelineError::Unauthorized`] if it does not match.
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<(), PipelineError> {
        match self.verifier.verify(payload, signature) {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("rejected request with invalid payload signature");
                Err(PipelineError::Unauthorized)
            }
            Err(e) => {
                warn!(error = %e, "rejected request with malformed payload signature");
                Err(PipelineError::BadRequest(format!("malformed payload signature: {e}")))
            }
        }
    }

    /// Return the outgoing conversation: the original messages, preceded by
    /// a grounding `system` message when a document matches the query.
    ///
    /// No grounding is added when the conversation has no non-empty user
    /// message or the corpus is empty.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Internal`] if the corpus cannot be built, the query
    /// cannot be embedded, or the embeddings are incomparable.
    pub async fn augment(
        &self,
        chat: ChatRequest,
        credentials: &Credentials,
    ) -> Result<Vec<ChatMessage>, PipelineError> {
        let index =
            self.corpus.get_or_build(credentials).await.context("error generating datasets")?;

        let Some(query) = chat.latest_user_query() else {
            debug!("no user message to ground; forwarding conversation unchanged");
            return Ok(chat.messages);
        };

        let embedding = self
            .embedder
            .embed(credentials, query)
            .await
            .context("error creating embedding for user message")?;

        let best = index.find_best(&embedding).context("error computing best dataset")?;
        let Some(entry) = best else {
            debug!("corpus is empty; forwarding conversation unchanged");
            return Ok(chat.messages);
        };

        info!(document.id = %entry.id(), "loading dataset");

        let mut messages = Vec::with_capacity(chat.messages.len() + 1);
        messages.push(grounding_message(&entry.document));
        messages.extend(chat.messages);
        Ok(messages)
    }
}

/// Builder for constructing a [`CompletionPipeline`].
///
/// All fields except `config` are required.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = CompletionPipeline::builder()
///     .verifier(SignatureVerifier::new(public_key))
///     .corpus_source(Arc::new(DirectoryCorpus::new("data")))
///     .embedder(Arc::new(CopilotEmbeddingProvider::new()))
///     .completion_client(Arc::new(CopilotCompletionClient::new()))
///     .build()?;
/// ```
#[derive(Default)]
pub struct CompletionPipelineBuilder {
    verifier: Option<SignatureVerifier>,
    corpus_source: Option<Arc<dyn CorpusSource>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    completions: Option<Arc<dyn CompletionClient>>,
    config: Option<ServerConfig>,
}

impl CompletionPipelineBuilder {
    /// Set the verifier holding the caller's public key.
    pub fn verifier(mut self, verifier: SignatureVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Set where the corpus documents come from.
    pub fn corpus_source(mut self, source: Arc<dyn CorpusSource>) -> Self {
        self.corpus_source = Some(source);
        self
    }

    /// Set the embedding provider, used for both the corpus and queries.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the completion provider.
    pub fn completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completions = Some(client);
        self
    }

    /// Set the server configuration. Defaults to [`ServerConfig::default`].
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the [`CompletionPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<CompletionPipeline, ConfigError> {
        let verifier =
            self.verifier.ok_or_else(|| ConfigError("verifier is required".to_string()))?;
        let corpus_source = self
            .corpus_source
            .ok_or_else(|| ConfigError("corpus_source is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| ConfigError("embedder is required".to_string()))?;
        let completions = self
            .completions
            .ok_or_else(|| ConfigError("completion_client is required".to_string()))?;

        Ok(CompletionPipeline {
            verifier,
            corpus: LazyCorpus::new(corpus_source, Arc::clone(&embedder)),
            embedder,
            completions,
            config: self.config.unwrap_or_default(),
        })
    }
}
