//! Mock completion client for testing.

use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use ragway_core::Credentials;

use crate::client::{CompletionClient, CompletionRequest};
use crate::error::{ModelError, Result};
use crate::lines::LineStream;

/// A [`CompletionClient`] that replays canned lines and records every
/// request it receives.
#[derive(Debug, Default)]
pub struct MockCompletionClient {
    lines: Vec<String>,
    reject_with: Option<String>,
    fail_after_lines: Option<io::ErrorKind>,
    calls: Mutex<Vec<(Credentials, CompletionRequest)>>,
}

impl MockCompletionClient {
    /// Answer every request with `lines`.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect(), ..Default::default() }
    }

    /// Refuse every request with an API error carrying `message`.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self { reject_with: Some(message.into()), ..Default::default() }
    }

    /// After the canned lines, end the stream with a read error of `kind`.
    pub fn with_stream_error(mut self, kind: io::ErrorKind) -> Self {
        self.fail_after_lines = Some(kind);
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(_, request)| request.clone()).collect())
            .unwrap_or_default()
    }

    /// The credentials presented with each request, oldest first.
    pub fn credentials(&self) -> Vec<Credentials> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(credentials, _)| credentials.clone()).collect())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn stream_complete(
        &self,
        credentials: &Credentials,
        request: CompletionRequest,
    ) -> Result<LineStream> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((credentials.clone(), request));
        }

        if let Some(message) = &self.reject_with {
            return Err(ModelError::Api { status: 500, message: message.clone() });
        }

        let mut items: Vec<Result<Bytes>> =
            self.lines.iter().map(|line| Ok(Bytes::from(line.clone()))).collect();
        if let Some(kind) = self.fail_after_lines {
            items.push(Err(ModelError::Stream(io::Error::new(kind, "mock stream failure"))));
        }
        Ok(Box::pin(stream::iter(items)))
    }
}
