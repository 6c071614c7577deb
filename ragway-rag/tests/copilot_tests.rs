//! Tests for the Copilot embeddings client against a mock server.

#![cfg(feature = "copilot")]

use ragway_core::Credentials;
use ragway_rag::copilot::CopilotEmbeddingProvider;
use ragway_rag::{EmbeddingProvider, RagError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials::new("gh-token", "my-integration")
}

#[tokio::test]
async fn returns_first_embedding_and_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer gh-token"))
        .and(header("copilot-integration-id", "my-integration"))
        .and(body_json(json!({ "model": "test-model", "input": ["hello"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [0.5, -0.25] }, { "embedding": [9.0, 9.0] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        CopilotEmbeddingProvider::new().with_base_url(server.uri()).with_model("test-model");
    let embedding = provider.embed(&credentials(), "hello").await.unwrap();
    assert_eq!(embedding, vec![0.5, -0.25]);
}

#[tokio::test]
async fn empty_data_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let provider = CopilotEmbeddingProvider::new().with_base_url(server.uri());
    let err = provider.embed(&credentials(), "hello").await.unwrap_err();
    assert!(
        matches!(err, RagError::EmbeddingError { ref message, .. } if message.contains("no embeddings")),
        "{err:?}"
    );
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "bad credentials" } })),
        )
        .mount(&server)
        .await;

    let provider = CopilotEmbeddingProvider::new().with_base_url(format!("{}/", server.uri()));
    let err = provider.embed(&credentials(), "hello").await.unwrap_err();
    let RagError::EmbeddingError { provider, message } = err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(provider, "Copilot");
    assert!(message.contains("401") && message.contains("bad credentials"), "{message}");
}
