//! Corpus sources: where the documents to embed come from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::document::Document;
use crate::error::{RagError, Result};

/// A fixed set of documents, enumerated once when the corpus is built.
///
/// Listing and reading are separate steps so that construction can read,
/// embed, and fail one document at a time.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// The identifiers of every document, in corpus order.
    async fn list(&self) -> Result<Vec<String>>;

    /// Read the full content of the document with identifier `id`.
    async fn read(&self, id: &str) -> Result<String>;
}

/// Every regular file directly inside a directory, ordered by file name.
///
/// Document identifiers are the file paths (`<dir>/<file name>`).
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    dir: PathBuf,
}

impl DirectoryCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn source_error(&self, message: String) -> RagError {
        RagError::SourceError { source_name: self.dir.display().to_string(), message }
    }
}

#[async_trait]
impl CorpusSource for DirectoryCorpus {
    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            self.source_error(format!("error reading files from \"{}\": {e}", self.dir.display()))
        })?;

        let mut files = Vec::new();
        while let Some(entry) =
            entries.next_entry().await.map_err(|e| self.source_error(e.to_string()))?
        {
            let file_type = entry.file_type().await.map_err(|e| self.source_error(e.to_string()))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        debug!(dir = %self.dir.display(), file_count = files.len(), "listed corpus directory");
        Ok(files.into_iter().map(|path| path.display().to_string()).collect())
    }

    async fn read(&self, id: &str) -> Result<String> {
        let bytes = tokio::fs::read(id).await.map_err(|e| RagError::SourceError {
            source_name: id.to_string(),
            message: format!("error reading in file: {e}"),
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// An in-memory corpus of pre-loaded documents, keyed by unique id.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    documents: Vec<Document>,
}

impl StaticCorpus {
    /// # Errors
    ///
    /// Returns [`RagError::SourceError`] if two documents share an id.
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(documents.len());
        if let Some(dup) = documents.iter().find(|d| !seen.insert(d.id.as_str())) {
            return Err(RagError::SourceError {
                source_name: dup.id.clone(),
                message: "duplicate document id".to_string(),
            });
        }
        Ok(Self { documents })
    }
}

#[async_trait]
impl CorpusSource for StaticCorpus {
    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.documents.iter().map(|d| d.id.clone()).collect())
    }

    async fn read(&self, id: &str) -> Result<String> {
        self.documents.iter().find(|d| d.id == id).map(|d| d.content.clone()).ok_or_else(|| {
            RagError::SourceError {
                source_name: id.to_string(),
                message: "document not found".to_string(),
            }
        })
    }
}
