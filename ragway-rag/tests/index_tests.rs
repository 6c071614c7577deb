//! Retrieval tests for cosine similarity and best-match selection.

use std::sync::Mutex;

use async_trait::async_trait;
use proptest::prelude::*;
use ragway_core::{Credentials, Embedding};
use ragway_rag::{
    DatasetEntry, DatasetIndex, Document, EmbeddingProvider, RagError, StaticCorpus,
    cosine_similarity, find_best,
};

fn entry(id: &str, embedding: Vec<f32>) -> DatasetEntry {
    DatasetEntry::new(Document::new(id, format!("content of {id}")), embedding)
}

/// Generate a non-zero embedding of the given dimension.
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter("non-zero embedding", |v| {
        v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-3
    })
}

mod prop_cosine_similarity {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn is_symmetric(a in arb_embedding(DIM), b in arb_embedding(DIM)) {
            prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
        }

        #[test]
        fn self_similarity_is_one(v in arb_embedding(DIM)) {
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
        }

        #[test]
        fn stays_within_unit_interval(a in arb_embedding(DIM), b in arb_embedding(DIM)) {
            let score = cosine_similarity(&a, &b);
            prop_assert!((-1.0 - 1e-5..=1.0 + 1e-5).contains(&score), "score {score} out of range");
        }
    }
}

#[test]
fn picks_the_most_similar_entry() {
    let entries = vec![
        entry("far", vec![0.0, 1.0]),
        entry("near", vec![0.9, 0.1]),
        entry("opposite", vec![-1.0, 0.0]),
    ];
    let best = find_best(&entries, &[1.0, 0.0]).unwrap().unwrap();
    assert_eq!(best.id(), "near");
}

#[test]
fn ties_go_to_the_first_entry() {
    // Both score 0.9 against the query.
    let entries = vec![entry("A", vec![0.9, 0.435_889_9]), entry("B", vec![0.9, -0.435_889_9])];
    let best = find_best(&entries, &[1.0, 0.0]).unwrap().unwrap();
    assert_eq!(best.id(), "A");
}

#[test]
fn negative_scores_still_produce_a_match() {
    let entries = vec![entry("only", vec![-1.0, 0.0])];
    let best = find_best(&entries, &[1.0, 0.0]).unwrap().unwrap();
    assert_eq!(best.id(), "only");
}

#[test]
fn empty_corpus_has_no_match() {
    assert!(find_best(&[], &[1.0, 0.0]).unwrap().is_none());
    assert!(DatasetIndex::default().find_best(&[1.0]).unwrap().is_none());
}

#[test]
fn dimension_mismatch_is_an_error() {
    let entries = vec![entry("a", vec![1.0, 0.0, 0.0])];
    let err = find_best(&entries, &[1.0, 0.0]).unwrap_err();
    assert_eq!(err, RagError::DimensionMismatch { document_id: "a".into(), expected: 2, actual: 3 });
}

/// Embeds text by counting occurrences of a few keywords.
struct KeywordEmbedder {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl KeywordEmbedder {
    fn new() -> Self {
        Self { calls: Mutex::new(Vec::new()), fail_on: None }
    }

    fn failing_on(text: &'static str) -> Self {
        Self { calls: Mutex::new(Vec::new()), fail_on: Some(text) }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, _credentials: &Credentials, text: &str) -> ragway_rag::Result<Embedding> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.fail_on == Some(text) {
            return Err(RagError::EmbeddingError {
                provider: "test".into(),
                message: "boom".into(),
            });
        }
        Ok(["rust", "go", "python"].iter().map(|k| text.matches(k).count() as f32).collect())
    }
}

#[tokio::test]
async fn build_embeds_each_document_once_in_order() {
    let source = StaticCorpus::new(vec![
        Document::new("rust.md", "rust rust"),
        Document::new("go.md", "go"),
    ])
    .unwrap();
    let embedder = KeywordEmbedder::new();

    let index = DatasetIndex::build(&source, &embedder, &Credentials::default()).await.unwrap();

    assert_eq!(*embedder.calls.lock().unwrap(), vec!["rust rust", "go"]);
    assert_eq!(index.len(), 2);
    assert_eq!(index.entries()[0].embedding, vec![2.0, 0.0, 0.0]);
    assert_eq!(index.find_best(&[0.0, 1.0, 0.0]).unwrap().unwrap().id(), "go.md");
}

#[tokio::test]
async fn build_stops_at_first_embedding_failure() {
    let source = StaticCorpus::new(vec![
        Document::new("a", "rust"),
        Document::new("b", "go"),
        Document::new("c", "python"),
    ])
    .unwrap();
    let embedder = KeywordEmbedder::failing_on("go");

    let err = DatasetIndex::build(&source, &embedder, &Credentials::default()).await.unwrap_err();

    assert!(matches!(err, RagError::CorpusError(ref msg) if msg.contains("b")), "{err:?}");
    assert_eq!(*embedder.calls.lock().unwrap(), vec!["rust", "go"]);
}
