//! The in-memory dataset index and cosine-similarity retrieval.
//!
//! This module provides [`DatasetIndex`], an immutable list of
//! [`DatasetEntry`]s built by embedding every document of a
//! [`CorpusSource`] once, and [`find_best`], a brute-force scan returning
//! the single most similar entry.

use ragway_core::Credentials;
use tracing::{debug, error, info};

use crate::document::{DatasetEntry, Document};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::source::CorpusSource;

/// Compute cosine similarity between two vectors of equal length.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Return the entry most similar to `query`.
///
/// Entries are scanned in order and a later entry only replaces the current
/// best on a strictly greater score, so ties go to the earlier entry.
///
/// # Errors
///
/// Returns [`RagError::DimensionMismatch`] if any entry's embedding length
/// differs from the query's. An empty slice yields `Ok(None)`.
pub fn find_best<'a>(entries: &'a [DatasetEntry], query: &[f32]) -> Result<Option<&'a DatasetEntry>> {
    let mut best: Option<(&DatasetEntry, f32)> = None;

    for entry in entries {
        if entry.embedding.len() != query.len() {
            return Err(RagError::DimensionMismatch {
                document_id: entry.id().to_string(),
                expected: query.len(),
                actual: entry.embedding.len(),
            });
        }

        let score = cosine_similarity(query, &entry.embedding);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((entry, score));
        }
    }

    if let Some((entry, score)) = best {
        debug!(document.id = %entry.id(), score, "best matching document");
    }
    Ok(best.map(|(entry, _)| entry))
}

/// An immutable corpus of embedded documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetIndex {
    entries: Vec<DatasetEntry>,
}

impl DatasetIndex {
    /// Wrap already-embedded entries.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] unless every embedding has the
    /// length of the first.
    pub fn from_entries(entries: Vec<DatasetEntry>) -> Result<Self> {
        if let Some(first) = entries.first() {
            let expected = first.embedding.len();
            if let Some(odd) = entries.iter().find(|e| e.embedding.len() != expected) {
                return Err(RagError::DimensionMismatch {
                    document_id: odd.id().to_string(),
                    expected,
                    actual: odd.embedding.len(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Read and embed every document of `source`, one embedding call per
    /// document, in corpus order.
    ///
    /// # Errors
    ///
    /// Stops at the first document that cannot be read or embedded and
    /// returns the error; no partial index is produced.
    pub async fn build(
        source: &dyn CorpusSource,
        embedder: &dyn EmbeddingProvider,
        credentials: &Credentials,
    ) -> Result<Self> {
        let ids = source.list().await?;
        info!(document_count = ids.len(), "building dataset index");

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let content = source.read(&id).await?;
            let embedding = embedder.embed(credentials, &content).await.map_err(|e| {
                error!(document.id = %id, error = %e, "embedding failed during corpus build");
                RagError::CorpusError(format!("error creating embedding for file {id}: {e}"))
            })?;
            debug!(document.id = %id, dimensions = embedding.len(), "embedded document");
            entries.push(DatasetEntry::new(Document::new(id, content), embedding));
        }

        Self::from_entries(entries)
    }

    /// See [`find_best`].
    pub fn find_best(&self, query: &[f32]) -> Result<Option<&DatasetEntry>> {
        find_best(&self.entries, query)
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
