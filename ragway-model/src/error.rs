//! Error types for the `ragway-model` crate.

use std::io;

use thiserror::Error;

/// Errors raised while requesting or reading a completion.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body.
        message: String,
    },

    /// The response stream has no more data.
    #[error("stream ended")]
    EndOfStream,

    /// Reading the response stream failed.
    #[error("stream read failed: {0}")]
    Stream(#[from] io::Error),
}

impl ModelError {
    /// Whether this error only signals that the stream is over.
    pub fn is_end_of_stream(&self) -> bool {
        match self {
            ModelError::EndOfStream => true,
            ModelError::Stream(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}

/// A convenience result type for completion operations.
pub type Result<T> = std::result::Result<T, ModelError>;
