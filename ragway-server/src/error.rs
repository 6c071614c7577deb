//! Pipeline failures and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Why a request could not be answered.
///
/// Only the category reaches the caller; the [`Internal`](PipelineError::Internal)
/// cause chain is for server-side logs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The body is not a chat request, or the signature cannot be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The signature is well-formed but does not match the payload.
    #[error("invalid payload signature")]
    Unauthorized,

    /// Any failure after authentication.
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PipelineError::Unauthorized => StatusCode::UNAUTHORIZED,
            PipelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let body = match &self {
            PipelineError::BadRequest(_) => "bad request",
            PipelineError::Unauthorized => "invalid payload signature",
            PipelineError::Internal(_) => "internal server error",
        };
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_categories_to_status_codes() {
        assert_eq!(PipelineError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(PipelineError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        let internal = PipelineError::from(anyhow::anyhow!("secret detail"));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_display_includes_context_chain() {
        let err = PipelineError::from(anyhow::anyhow!("root cause").context("while embedding"));
        assert_eq!(err.to_string(), "internal error: while embedding: root cause");
    }
}
