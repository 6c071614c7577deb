//! Configuration for the gateway server.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An invalid [`ServerConfig`] or incomplete pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

/// Configuration parameters for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Directory whose files make up the retrieval corpus.
    pub data_dir: PathBuf,
    /// Chat model requested from the completion provider.
    pub chat_model: String,
    /// Embedding model requested from the embedding provider.
    pub embedding_model: String,
    /// Base URL of the provider API.
    pub api_base_url: String,
    /// Integration id sent to the completion endpoint. `None` forwards the
    /// caller's own integration id.
    pub completion_integration_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            chat_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "copilot-text-embedding-ada-002".to_string(),
            api_base_url: "https://api.githubcopilot.com".to_string(),
            completion_integration_id: Some("copilot-chat".to_string()),
        }
    }
}

impl ServerConfig {
    /// Create a new builder for constructing a [`ServerConfig`].
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`ServerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn completion_integration_id(mut self, id: Option<String>) -> Self {
        self.config.completion_integration_id = id;
        self
    }

    /// Build the [`ServerConfig`], validating its fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - a model name is empty
    /// - `api_base_url` is not an `http://` or `https://` URL
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        if self.config.chat_model.trim().is_empty() {
            return Err(ConfigError("chat_model must not be empty".to_string()));
        }
        if self.config.embedding_model.trim().is_empty() {
            return Err(ConfigError("embedding_model must not be empty".to_string()));
        }
        let url = &self.config.api_base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError(format!("api_base_url must be an http(s) URL, got '{url}'")));
        }
        Ok(self.config)
    }
}
