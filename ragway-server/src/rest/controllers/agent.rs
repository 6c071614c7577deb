//! The chat completion endpoint.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use ragway_core::Credentials;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

use crate::error::PipelineError;
use crate::forward::forward_lines;
use crate::pipeline::InboundRequest;
use crate::rest::AppState;

/// Base64 DER signature of the raw request body.
pub const SIGNATURE_HEADER: &str = "Github-Public-Key-Signature";
/// The caller's token for the upstream providers.
pub const TOKEN_HEADER: &str = "X-GitHub-Token";
/// The caller's integration identifier for the upstream providers.
pub const INTEGRATION_ID_HEADER: &str = "Copilot-Integration-Id";

/// Bytes buffered between the forwarder and the response body.
const PIPE_CAPACITY: usize = 64 * 1024;

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string()
}

/// `POST /agent`: answer a signed chat request with a grounded, streamed
/// completion.
///
/// Every step up to opening the provider stream runs before the status is
/// chosen, so authentication and provider failures get real 4xx/5xx codes.
/// The answer then streams through an in-process pipe; when the client goes
/// away the pipe closes and the forwarder stops at its next write.
pub async fn chat_completion(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = InboundRequest {
        payload: body,
        signature: header_value(&headers, SIGNATURE_HEADER),
        credentials: Credentials::new(
            header_value(&headers, TOKEN_HEADER),
            header_value(&headers, INTEGRATION_ID_HEADER),
        ),
    };

    let lines = match state.pipeline.prepare(&request).await {
        Ok(lines) => lines,
        Err(e) => {
            match &e {
                PipelineError::Internal(cause) => {
                    error!(error = %format!("{cause:#}"), "failed to execute agent")
                }
                other => debug!(error = %other, "rejected agent request"),
            }
            return e.into_response();
        }
    };

    let (mut writer, reader) = tokio::io::duplex(PIPE_CAPACITY);
    tokio::spawn(async move {
        if let Err(e) = forward_lines(lines, &mut writer).await {
            warn!(error = %e, "completion stream aborted");
        }
    });

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(ReaderStream::new(reader)),
    )
        .into_response()
}
