// ABOUTME: Daemon client trait for the two streaming image endpoints.
// ABOUTME: Pull by name and build from a context archive, each yielding raw JSON chunks.

use crate::types::ImageName;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;

/// Raw response chunks from the daemon, in the order they were sent.
///
/// Chunk boundaries carry no meaning: a chunk may hold several JSON objects
/// or a fragment of one. The stream ending is the end-of-stream signal.
pub type EventStream = Pin<Box<dyn Stream<Item = Bytes> + Send>>;

/// Build context (a tar archive) read incrementally from disk.
pub type ContextStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Client for a Docker-compatible daemon.
#[async_trait]
pub trait DaemonClient: Send + Sync {
    /// Ask the daemon to pull `name`.
    ///
    /// An `Err` means the request was refused before any stream existed.
    async fn pull(&self, name: &ImageName) -> Result<EventStream, RequestError>;

    /// Ask the daemon to build an image from the given context archive.
    async fn build_image(
        &self,
        context: ContextStream,
        options: &BuildOptions,
    ) -> Result<EventStream, RequestError>;
}

/// Query options for an image build. Only the tag is recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
    /// Name the built image is tagged with.
    pub t: String,
}

impl BuildOptions {
    pub fn tagged(name: &ImageName) -> Self {
        Self {
            t: name.as_str().to_string(),
        }
    }
}

/// The daemon refused a request outright.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("daemon rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}
