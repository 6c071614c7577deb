//! # ragway-server
//!
//! The retrieval-augmented completion pipeline and its HTTP endpoint.
//!
//! A request flows through [`CompletionPipeline`] in a straight line:
//!
//! 1. verify the payload signature (fail fast with 400/401)
//! 2. parse the conversation
//! 3. make sure the corpus is built
//! 4. embed the newest non-empty user message
//! 5. retrieve the most similar document
//! 6. prepend it as a `system` message
//! 7. ask the completion provider for a streamed answer
//! 8. forward the answer line by line
//!
//! [`rest::router`] mounts the pipeline at `POST /agent`.

pub mod config;
pub mod error;
pub mod forward;
pub mod pipeline;
pub mod rest;

pub use config::{ConfigError, ServerConfig};
pub use error::PipelineError;
pub use forward::forward_lines;
pub use pipeline::{
    CompletionPipeline, CompletionPipelineBuilder, GROUNDING_PREAMBLE, InboundRequest,
    grounding_message,
};
pub use rest::{AppState, router};
