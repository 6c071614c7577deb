//! Splitting a response body into lines.

use std::error::Error;
use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};
use tokio::io::AsyncBufReadExt;
use tokio_stream::wrappers::SplitStream;
use tokio_util::io::StreamReader;

use crate::error::{ModelError, Result};

/// A provider response as a stream of lines, terminators stripped.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Split a chunked byte stream on `\n`, dropping a trailing `\r` from each
/// line.
///
/// Lines may span any number of chunks; only the line being assembled is
/// buffered. A final line without a terminator is still yielded, while a
/// terminator at the very end does not produce an extra empty line.
pub fn line_stream<S, E>(body: S) -> LineStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<Box<dyn Error + Send + Sync>> + 'static,
{
    let reader = StreamReader::new(Box::pin(body.map_err(io::Error::other)));
    let lines = SplitStream::new(reader.split(b'\n')).map(|line| -> Result<Bytes> {
        let mut line = line.map_err(ModelError::from)?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(Bytes::from(line))
    });
    Box::pin(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    async fn collect(chunks: Vec<&'static str>) -> Vec<String> {
        let body = stream::iter(chunks.into_iter().map(|c| Ok::<_, io::Error>(Bytes::from(c))));
        line_stream(body)
            .map(|line| String::from_utf8(line.unwrap().to_vec()).unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn joins_lines_split_across_chunks() {
        let lines = collect(vec!["data: {\"a\"", ":1}\n\ndata: ", "[DONE]\n"]).await;
        assert_eq!(lines, vec!["data: {\"a\":1}", "", "data: [DONE]"]);
    }

    #[tokio::test]
    async fn strips_carriage_returns_and_keeps_unterminated_tail() {
        let lines = collect(vec!["one\r\ntwo\r", "\nthree"]).await;
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn empty_body_yields_nothing() {
        assert!(collect(vec![]).await.is_empty());
    }

    #[tokio::test]
    async fn body_errors_surface_as_stream_errors() {
        let body = stream::iter(vec![
            Ok(Bytes::from("partial\n")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let items: Vec<_> = line_stream(body).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from("partial"));
        assert!(matches!(items[1], Err(ModelError::Stream(_))));
    }

    #[tokio::test]
    async fn accepts_owned_non_io_body_errors() {
        let body = stream::iter(vec![
            Ok(Bytes::from("data: 1\n")),
            Err::<Bytes, Box<dyn Error + Send + Sync>>("connection closed".into()),
        ]);
        let lines: LineStream = line_stream(body);
        let items: Vec<_> = lines.collect().await;
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from("data: 1"));
        let Err(ModelError::Stream(e)) = &items[1] else {
            panic!("expected a stream error, got {:?}", items[1]);
        };
        assert_eq!(e.to_string(), "connection closed");
    }
}
