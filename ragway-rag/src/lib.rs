//! # ragway-rag
//!
//! Retrieval for the ragway gateway: a small corpus of documents is
//! embedded once, held in memory, and searched by cosine similarity for the
//! single document that best grounds a user's query.
//!
//! - [`CorpusSource`] enumerates the documents ([`DirectoryCorpus`],
//!   [`StaticCorpus`]).
//! - [`EmbeddingProvider`] turns text into an [`Embedding`](ragway_core::Embedding).
//! - [`DatasetIndex`] holds the `(document, embedding)` entries and answers
//!   [`find_best`] queries.
//! - [`LazyCorpus`] builds the index exactly once per instance, shared by
//!   every concurrent caller.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragway_rag::{DirectoryCorpus, LazyCorpus};
//! use ragway_rag::copilot::CopilotEmbeddingProvider;
//!
//! let corpus = LazyCorpus::new(
//!     Arc::new(DirectoryCorpus::new("data")),
//!     Arc::new(CopilotEmbeddingProvider::new()),
//! );
//! let index = corpus.get_or_build(&credentials).await?;
//! let best = index.find_best(&query_embedding)?;
//! ```

pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod source;

#[cfg(feature = "copilot")]
pub mod copilot;

pub use corpus::{CorpusStatus, LazyCorpus};
pub use document::{DatasetEntry, Document};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{DatasetIndex, cosine_similarity, find_best};
pub use source::{CorpusSource, DirectoryCorpus, StaticCorpus};
