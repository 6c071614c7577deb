//! Error types for the `ragway-rag` crate.

use thiserror::Error;

/// Errors that can occur while building or querying the corpus.
///
/// Every variant carries plain data so a failed corpus construction can be
/// handed, unchanged, to every caller that waited on it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A document could not be listed or read from its source.
    #[error("Corpus source error ({source_name}): {message}")]
    SourceError {
        /// The corpus source or document that failed.
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// Two embeddings of different lengths were compared.
    #[error(
        "Embedding dimension mismatch for '{document_id}': expected {expected}, got {actual}"
    )]
    DimensionMismatch {
        /// The corpus entry whose embedding did not match.
        document_id: String,
        /// The dimensionality of the query (or of the first corpus entry).
        expected: usize,
        /// The dimensionality actually found.
        actual: usize,
    },

    /// Corpus construction failed.
    #[error("Corpus error: {0}")]
    CorpusError(String),
}

/// A convenience result type for corpus operations.
pub type Result<T> = std::result::Result<T, RagError>;
