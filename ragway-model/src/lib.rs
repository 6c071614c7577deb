//! # ragway-model
//!
//! Chat-completion providers for the ragway gateway.
//!
//! A [`CompletionClient`] takes a conversation and returns the provider's
//! streamed answer as a [`LineStream`]: one item per line of the response
//! body, without the line terminator. The gateway forwards these lines to
//! its caller verbatim, so no provider-specific chunk parsing happens here.
//!
//! - [`copilot::CopilotCompletionClient`] - the Copilot chat completions API
//! - [`MockCompletionClient`] - replays canned lines, for tests and local runs
//!
//! ```rust,ignore
//! use ragway_model::{CompletionClient, CompletionRequest};
//! use futures::StreamExt;
//!
//! let request = CompletionRequest::streaming("gpt-4o", messages);
//! let mut lines = client.stream_complete(&credentials, request).await?;
//! while let Some(line) = lines.next().await {
//!     println!("{}", String::from_utf8_lossy(&line?));
//! }
//! ```

pub mod client;
pub mod error;
pub mod lines;
pub mod mock;

#[cfg(feature = "copilot")]
pub mod copilot;

pub use client::{CompletionClient, CompletionRequest};
pub use error::{ModelError, Result};
pub use lines::{LineStream, line_stream};
pub use mock::MockCompletionClient;
