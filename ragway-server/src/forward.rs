//! Forwarding a provider's line stream to the caller.

use anyhow::{Context, anyhow};
use futures::StreamExt;
use ragway_model::LineStream;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::PipelineError;

/// Write every line of `lines` to `sink`, each followed by `\n`.
///
/// Lines are written as they arrive; nothing beyond the current line is
/// buffered. Returns the number of lines forwarded.
///
/// # Errors
///
/// Returns [`PipelineError::Internal`] as soon as a write to `sink` fails
/// (the rest of the stream is not read) or the stream reports a read error.
/// A read error that only signals the end of the stream counts as success.
pub async fn forward_lines<W>(mut lines: LineStream, sink: &mut W) -> Result<u64, PipelineError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut forwarded = 0u64;

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.is_end_of_stream() => break,
            Err(e) => return Err(anyhow!(e).context("failed to read from stream").into()),
        };

        sink.write_all(&line).await.context("failed to write to stream")?;
        sink.write_all(b"\n").await.context("failed to write delimiter to stream")?;
        sink.flush().await.context("failed to flush stream")?;
        forwarded += 1;
    }

    debug!(lines = forwarded, "forwarded completion stream");
    Ok(forwarded)
}
