// ABOUTME: Folds a daemon progress stream into a single outcome.
// ABOUTME: Buffers every chunk, then looks for errorDetail.message once the stream ends.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use serde_json::Value;

use super::ImageError;

/// Terminal state of a progress stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// The daemon's `errorDetail.message`.
    Failed(String),
}

impl Outcome {
    pub fn into_result(self) -> Result<(), ImageError> {
        match self {
            Outcome::Succeeded => Ok(()),
            Outcome::Failed(message) => Err(ImageError::Daemon { message }),
        }
    }
}

/// Accumulates raw chunks and classifies them at end of stream.
///
/// Chunks are concatenated byte for byte and nothing is parsed until
/// [`finish`](Self::finish). The whole buffer is then read as one JSON
/// document: if that fails the stream counts as a success. Progress output is
/// usually several concatenated objects, so only a stream consisting of a
/// single error object is reported as a failure. An error object that
/// follows progress lines is not detected.
#[derive(Debug, Default)]
pub struct StreamReducer {
    buffer: BytesMut,
}

impl StreamReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn finish(self) -> Outcome {
        let value: Value = match serde_json::from_slice(&self.buffer) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(
                    bytes = self.buffer.len(),
                    "stream is not a single JSON document, treating as success: {}",
                    e
                );
                return Outcome::Succeeded;
            }
        };

        match value.pointer("/errorDetail/message").and_then(Value::as_str) {
            Some(message) => Outcome::Failed(message.to_string()),
            None => Outcome::Succeeded,
        }
    }
}

/// Drain `stream` to its end and classify what it sent.
pub async fn reduce<S>(stream: S) -> Outcome
where
    S: Stream<Item = Bytes>,
{
    let mut stream = std::pin::pin!(stream);
    let mut reducer = StreamReducer::new();

    while let Some(chunk) = stream.next().await {
        tracing::trace!(len = chunk.len(), "stream chunk");
        reducer.push(&chunk);
    }

    let outcome = reducer.finish();
    tracing::debug!(?outcome, "stream ended");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(chunks: &[&str]) -> Outcome {
        let mut reducer = StreamReducer::new();
        for chunk in chunks {
            reducer.push(chunk.as_bytes());
        }
        reducer.finish()
    }

    #[test]
    fn empty_stream_succeeds() {
        let reducer = StreamReducer::new();
        assert!(reducer.is_empty());
        assert_eq!(reducer.finish(), Outcome::Succeeded);
    }

    #[test]
    fn single_error_object_fails() {
        let outcome = finish(&[r#"{"errorDetail":{"message":"elvis lives!"}}"#]);
        assert_eq!(outcome, Outcome::Failed("elvis lives!".to_string()));
    }

    #[test]
    fn error_object_split_across_chunks_fails() {
        let outcome = finish(&[r#"{"errorDe"#, r#"tail":{"mess"#, r#"age":"boom"}}"#]);
        assert_eq!(outcome, Outcome::Failed("boom".to_string()));
    }

    #[test]
    fn chunks_are_joined_without_delimiter() {
        let mut reducer = StreamReducer::new();
        reducer.push(b"ab");
        reducer.push(b"cd");
        assert_eq!(reducer.len(), 4);
    }

    #[test]
    fn truncated_error_object_succeeds() {
        let outcome = finish(&[r#"{"errorDetail":{"message":"incomplete json -->""#]);
        assert_eq!(outcome, Outcome::Succeeded);
    }

    #[test]
    fn single_progress_object_succeeds() {
        let outcome = finish(&[r#"{"status":"Downloading","progressDetail":{"current":1}}"#]);
        assert_eq!(outcome, Outcome::Succeeded);
    }

    #[test]
    fn non_string_message_is_not_an_error() {
        assert_eq!(finish(&[r#"{"errorDetail":{"message":42}}"#]), Outcome::Succeeded);
        assert_eq!(finish(&[r#"{"errorDetail":{}}"#]), Outcome::Succeeded);
        assert_eq!(finish(&[r#"[{"errorDetail":{"message":"x"}}]"#]), Outcome::Succeeded);
    }

    // Known gap: multi-object streams never parse as one document, so a
    // trailing error after progress lines goes unreported.
    #[test]
    fn error_after_progress_lines_is_not_detected() {
        let outcome = finish(&[
            "{\"status\":\"Pulling from library/nope\"}\r\n",
            "{\"errorDetail\":{\"message\":\"manifest unknown\"},\"error\":\"manifest unknown\"}\r\n",
        ]);
        assert_eq!(outcome, Outcome::Succeeded);
    }

    #[test]
    fn failed_outcome_becomes_daemon_error() {
        let err = Outcome::Failed("nope".into()).into_result().unwrap_err();
        assert!(matches!(err, ImageError::Daemon { ref message } if message == "nope"));
        assert!(Outcome::Succeeded.into_result().is_ok());
    }

    #[tokio::test]
    async fn reduce_drains_stream_in_order() {
        let chunks = vec![
            Bytes::from_static(br#"{"errorDetail":"#),
            Bytes::from_static(br#"{"message":"late"}}"#),
        ];
        let outcome = reduce(futures::stream::iter(chunks)).await;
        assert_eq!(outcome, Outcome::Failed("late".to_string()));
    }
}
