// ABOUTME: Image descriptor handed to pull and build.
// ABOUTME: Pairs an image name with an optional build context directory.

use super::ImageName;
use std::path::{Path, PathBuf};

/// What to pull or build.
///
/// `src` is only consulted by build; pull ignores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    name: ImageName,
    src: Option<PathBuf>,
}

impl Image {
    /// Descriptor for an image that is only ever pulled.
    pub fn named(name: ImageName) -> Self {
        Self { name, src: None }
    }

    /// Descriptor for an image built from a local context directory.
    pub fn with_context(name: ImageName, src: impl Into<PathBuf>) -> Self {
        Self {
            name,
            src: Some(src.into()),
        }
    }

    pub fn name(&self) -> &ImageName {
        &self.name
    }

    pub fn src(&self) -> Option<&Path> {
        self.src.as_deref()
    }
}
