//! Data types for corpus documents and their embeddings.

use ragway_core::Embedding;
use serde::{Deserialize, Serialize};

/// A source document: an identifier (typically a file path) and its raw text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The raw text content of the document.
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id: id.into(), content: content.into() }
    }
}

/// A [`Document`] paired with the embedding of its full content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetEntry {
    /// The embedded document.
    pub document: Document,
    /// The vector embedding of the document's content.
    pub embedding: Embedding,
}

impl DatasetEntry {
    pub fn new(document: Document, embedding: Embedding) -> Self {
        Self { document, embedding }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }
}
