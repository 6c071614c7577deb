//! Tests for forwarding a provider's line stream to the caller.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use ragway_model::{LineStream, ModelError};
use ragway_server::{PipelineError, forward_lines};

fn lines(items: Vec<Result<&'static str, ModelError>>) -> LineStream {
    Box::pin(stream::iter(
        items.into_iter().map(|item| item.map(|line| Bytes::from_static(line.as_bytes()))),
    ))
}

#[tokio::test]
async fn writes_each_line_followed_by_newline() {
    let mut sink = Vec::new();
    let count = forward_lines(lines(vec![Ok("data: 1"), Ok(""), Ok("data: [DONE]")]), &mut sink)
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(sink, b"data: 1\n\ndata: [DONE]\n");
}

#[tokio::test]
async fn end_of_stream_errors_count_as_success() {
    let mut sink = Vec::new();
    forward_lines(lines(vec![Ok("a"), Err(ModelError::EndOfStream), Ok("never")]), &mut sink)
        .await
        .unwrap();
    assert_eq!(sink, b"a\n");

    let mut sink = Vec::new();
    let eof = ModelError::Stream(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
    forward_lines(lines(vec![Ok("b"), Err(eof)]), &mut sink).await.unwrap();
    assert_eq!(sink, b"b\n");
}

#[tokio::test]
async fn other_read_errors_are_internal() {
    let mut sink = Vec::new();
    let reset = ModelError::Stream(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));

    let err = forward_lines(lines(vec![Ok("partial"), Err(reset)]), &mut sink).await.unwrap_err();

    let PipelineError::Internal(cause) = err else {
        panic!("expected an internal error, got {err:?}");
    };
    assert!(format!("{cause:#}").contains("failed to read from stream"));
    assert_eq!(sink, b"partial\n");
}

#[tokio::test]
async fn write_failure_stops_consuming_the_upstream() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let upstream: LineStream = {
        let pulled = pulled.clone();
        Box::pin(stream::iter(0..1_000).map(move |i| {
            pulled.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from(format!("line {i}")))
        }))
    };

    // The caller hung up: the read half of the pipe is gone.
    let (mut writer, reader) = tokio::io::duplex(64);
    drop(reader);

    let err = forward_lines(upstream, &mut writer).await.unwrap_err();

    let PipelineError::Internal(cause) = err else {
        panic!("expected an internal error, got {err:?}");
    };
    assert!(format!("{cause:#}").contains("failed to write to stream"));
    assert_eq!(pulled.load(Ordering::SeqCst), 1);
}
