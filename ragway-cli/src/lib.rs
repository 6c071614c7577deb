//! Launcher for the ragway gateway.
//!
//! Parses flags (each also readable from the environment), loads the
//! signature verification key and wires the Copilot clients into a
//! [`CompletionPipeline`] served over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ragway_auth::{DEFAULT_PUBLIC_KEY_URL, SignatureVerifier, VerifyingKey};
use ragway_model::copilot::CopilotCompletionClient;
use ragway_rag::DirectoryCorpus;
use ragway_rag::copilot::CopilotEmbeddingProvider;
use ragway_server::{CompletionPipeline, ServerConfig};
use ragway_telemetry::LogFormat;
use tracing::info;

/// Retrieval-augmented completion gateway for Copilot agents.
#[derive(Debug, Clone, Parser)]
#[command(name = "ragway", version, about)]
pub struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory whose files make up the retrieval corpus
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// URL of the public key listing used to verify payload signatures
    #[arg(long, env = "PUBLIC_KEY_URL", default_value = DEFAULT_PUBLIC_KEY_URL)]
    pub public_key_url: String,

    /// PEM file holding the verification key; skips the network fetch
    #[arg(long, env = "PUBLIC_KEY_FILE")]
    pub public_key_file: Option<PathBuf>,

    /// Base URL of the Copilot API
    #[arg(long, env = "API_BASE_URL", default_value = "https://api.githubcopilot.com")]
    pub api_base_url: String,

    /// Chat model requested for completions
    #[arg(long, env = "CHAT_MODEL", default_value = "gpt-3.5-turbo")]
    pub chat_model: String,

    /// Embedding model requested for the corpus and user queries
    #[arg(long, env = "EMBEDDING_MODEL", default_value = "copilot-text-embedding-ada-002")]
    pub embedding_model: String,

    /// Integration id sent to the completion endpoint; empty forwards the caller's
    #[arg(long, env = "COMPLETION_INTEGRATION_ID", default_value = "copilot-chat")]
    pub completion_integration_id: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Args {
    /// Validated server configuration derived from the flags.
    pub fn server_config(&self) -> anyhow::Result<ServerConfig> {
        let integration_id = Some(self.completion_integration_id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let config = ServerConfig::builder()
            .data_dir(&self.data_dir)
            .chat_model(&self.chat_model)
            .embedding_model(&self.embedding_model)
            .api_base_url(&self.api_base_url)
            .completion_integration_id(integration_id)
            .build()?;
        Ok(config)
    }

    /// Address the server binds to.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Load the verification key from `--public-key-file`, or fetch the current
/// key from `--public-key-url`.
pub async fn load_public_key(args: &Args, client: &reqwest::Client) -> anyhow::Result<VerifyingKey> {
    if let Some(path) = &args.public_key_file {
        let pem = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read public key file {}", path.display()))?;
        return ragway_auth::public_key_from_pem(&pem)
            .with_context(|| format!("invalid public key in {}", path.display()));
    }

    ragway_auth::fetch_public_key(client, &args.public_key_url)
        .await
        .with_context(|| format!("failed to fetch public key from {}", args.public_key_url))
}

/// Wire the Copilot clients and the on-disk corpus into a pipeline.
pub fn build_pipeline(
    config: ServerConfig,
    key: VerifyingKey,
    client: reqwest::Client,
) -> anyhow::Result<CompletionPipeline> {
    let embedder = CopilotEmbeddingProvider::new()
        .with_client(client.clone())
        .with_base_url(&config.api_base_url)
        .with_model(&config.embedding_model);
    let completions = CopilotCompletionClient::new()
        .with_client(client)
        .with_base_url(&config.api_base_url);

    let pipeline = CompletionPipeline::builder()
        .verifier(SignatureVerifier::new(key))
        .corpus_source(Arc::new(DirectoryCorpus::new(&config.data_dir)))
        .embedder(Arc::new(embedder))
        .completion_client(Arc::new(completions))
        .config(config)
        .build()?;
    Ok(pipeline)
}

/// Run the gateway until the listener fails.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.server_config()?;
    let client = reqwest::Client::new();
    let key = load_public_key(&args, &client).await?;
    let pipeline = build_pipeline(config, key, client)?;

    info!(
        data_dir = %pipeline.config().data_dir.display(),
        chat_model = %pipeline.config().chat_model,
        embedding_model = %pipeline.config().embedding_model,
        "pipeline ready"
    );

    let app = ragway_server::router(Arc::new(pipeline));
    let addr = args.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("ragway listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
