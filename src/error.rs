// ABOUTME: Application-wide error types for hoist.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::image::{BatchError, ImageError};
use crate::runtime::RuntimeError;
use crate::types::ParseImageNameError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid image name: {0}")]
    InvalidImageName(#[from] ParseImageNameError),

    #[error("unknown image: {0}")]
    UnknownImage(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no images to {0}")]
    NoImages(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

pub type Result<T> = std::result::Result<T, Error>;
