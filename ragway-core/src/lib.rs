//! # ragway-core
//!
//! Types shared by every ragway crate: the chat conversation model that
//! flows from the inbound request to the completion provider, the caller's
//! upstream credentials, and the [`Embedding`] vector type.

pub mod chat;
pub mod credentials;

pub use chat::{ChatMessage, ChatRequest, Role};
pub use credentials::Credentials;

/// A fixed-length vector representing the semantic content of a text.
///
/// Two embeddings are only comparable when their lengths match exactly.
pub type Embedding = Vec<f32>;
