//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;
use ragway_core::{Credentials, Embedding};

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// The caller's [`Credentials`] are passed on every call because the
/// upstream provider authenticates per request, not per process.
///
/// # Example
///
/// ```rust,ignore
/// use ragway_rag::EmbeddingProvider;
///
/// let embedding = provider.embed(&credentials, "hello world").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, credentials: &Credentials, text: &str) -> Result<Embedding>;
}
