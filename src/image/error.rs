// ABOUTME: Error taxonomy for pull and build.
// ABOUTME: Separates request rejection, daemon-reported failures and build-context problems.

use crate::runtime::traits::RequestError;
use crate::types::ImageName;
use std::path::PathBuf;

/// Errors from a single pull or build.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The daemon refused the request before any progress stream existed.
    #[error("request rejected: {0}")]
    RequestRejected(#[from] RequestError),

    /// The progress stream ended with an `errorDetail` payload.
    #[error("daemon reported error: {message}")]
    Daemon { message: String },

    #[error("no build context configured for image {0}")]
    MissingContext(ImageName),

    #[error("archive creation failed in {}: {reason}", .dir.display())]
    Archive { dir: PathBuf, reason: String },

    #[error("failed to open build context {}: {source}", .path.display())]
    Context {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageErrorKind {
    RequestRejected,
    Daemon,
    MissingContext,
    Archive,
    Context,
}

impl ImageError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ImageErrorKind {
        match self {
            ImageError::RequestRejected(_) => ImageErrorKind::RequestRejected,
            ImageError::Daemon { .. } => ImageErrorKind::Daemon,
            ImageError::MissingContext(_) => ImageErrorKind::MissingContext,
            ImageError::Archive { .. } => ImageErrorKind::Archive,
            ImageError::Context { .. } => ImageErrorKind::Context,
        }
    }
}

/// A batch stopped at the first image that failed.
#[derive(Debug, thiserror::Error)]
#[error("{image}: {source}")]
pub struct BatchError {
    pub image: ImageName,
    pub source: ImageError,
}
