//! HTTP routing for the gateway.

pub mod controllers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::pipeline::CompletionPipeline;

/// Shared state handed to every controller.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CompletionPipeline>,
}

/// Build the gateway router: `POST /agent` and `GET /health`.
pub fn router(pipeline: Arc<CompletionPipeline>) -> Router {
    Router::new()
        .route("/agent", post(controllers::agent::chat_completion))
        .route("/health", get(controllers::health::health))
        .with_state(AppState { pipeline })
        .layer(TraceLayer::new_for_http())
}
