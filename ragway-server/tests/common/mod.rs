//! Shared fixtures for pipeline and HTTP tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use ragway_auth::{SignatureVerifier, VerifyingKey};
use ragway_core::{Credentials, Embedding};
use ragway_model::MockCompletionClient;
use ragway_rag::{CorpusSource, Document, EmbeddingProvider, StaticCorpus};
use ragway_server::{CompletionPipeline, InboundRequest, ServerConfig};

pub const KEYWORDS: [&str; 3] = ["rust", "go", "python"];

/// Embeds text as keyword counts and records every text it was asked for.
#[derive(Default)]
pub struct KeywordEmbedder {
    calls: Mutex<Vec<String>>,
}

impl KeywordEmbedder {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, _credentials: &Credentials, text: &str) -> ragway_rag::Result<Embedding> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(KEYWORDS.iter().map(|k| text.matches(k).count() as f32).collect())
    }
}

pub fn signing_key() -> SigningKey {
    SigningKey::from_slice(&[0x42; 32]).unwrap()
}

pub fn sign(payload: &[u8]) -> String {
    let signature: Signature = signing_key().sign(payload);
    STANDARD.encode(signature.to_der().as_bytes())
}

pub fn credentials() -> Credentials {
    Credentials::new("gh-token", "my-integration")
}

pub fn signed_request(body: &str) -> InboundRequest {
    InboundRequest {
        payload: Bytes::copy_from_slice(body.as_bytes()),
        signature: sign(body.as_bytes()),
        credentials: credentials(),
    }
}

pub struct Harness {
    pub pipeline: Arc<CompletionPipeline>,
    pub embedder: Arc<KeywordEmbedder>,
    pub completions: Arc<MockCompletionClient>,
}

pub fn harness_with_source(
    source: Arc<dyn CorpusSource>,
    completions: MockCompletionClient,
) -> Harness {
    harness_with_config(source, completions, ServerConfig::default())
}

pub fn harness_with_config(
    source: Arc<dyn CorpusSource>,
    completions: MockCompletionClient,
    config: ServerConfig,
) -> Harness {
    let embedder = Arc::new(KeywordEmbedder::default());
    let completions = Arc::new(completions);
    let pipeline = CompletionPipeline::builder()
        .verifier(SignatureVerifier::new(VerifyingKey::from(&signing_key())))
        .corpus_source(source)
        .embedder(embedder.clone())
        .completion_client(completions.clone())
        .config(config)
        .build()
        .unwrap();
    Harness { pipeline: Arc::new(pipeline), embedder, completions }
}

/// A pipeline over `documents` with a caller-supplied embedder.
pub fn pipeline_with_embedder(
    documents: Vec<Document>,
    embedder: Arc<dyn EmbeddingProvider>,
    completions: Arc<MockCompletionClient>,
) -> CompletionPipeline {
    CompletionPipeline::builder()
        .verifier(SignatureVerifier::new(VerifyingKey::from(&signing_key())))
        .corpus_source(Arc::new(StaticCorpus::new(documents).unwrap()))
        .embedder(embedder)
        .completion_client(completions)
        .build()
        .unwrap()
}

pub fn harness(documents: Vec<Document>, completions: MockCompletionClient) -> Harness {
    harness_with_source(Arc::new(StaticCorpus::new(documents).unwrap()), completions)
}

/// A two-document corpus: `rust.md` talks about rust, `go.md` about go.
pub fn two_documents() -> Vec<Document> {
    vec![
        Document::new("data/go.md", "go go go: goroutines and channels"),
        Document::new("data/rust.md", "rust rust: ownership and borrowing"),
    ]
}
