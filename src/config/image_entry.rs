// ABOUTME: Image entries in hoist.yml.
// ABOUTME: Accepts a bare name or a {name, src} mapping.

use crate::types::{Image, ImageName, ParseImageNameError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Names are validated after the shape is matched, so a bad name reports
/// the name error instead of "did not match any variant".
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawImageEntry")]
pub enum ImageEntry {
    Simple(ImageName),
    Detailed {
        name: ImageName,
        #[serde(default)]
        src: Option<PathBuf>,
    },
}

impl ImageEntry {
    pub fn name(&self) -> &ImageName {
        match self {
            ImageEntry::Simple(name) => name,
            ImageEntry::Detailed { name, .. } => name,
        }
    }

    /// Resolve into a descriptor, joining a relative `src` onto `base`.
    pub fn into_image(self, base: &Path) -> Image {
        match self {
            ImageEntry::Simple(name) | ImageEntry::Detailed { name, src: None } => {
                Image::named(name)
            }
            ImageEntry::Detailed {
                name,
                src: Some(src),
            } => {
                let src = if src.is_absolute() { src } else { base.join(src) };
                Image::with_context(name, src)
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImageEntry {
    Simple(String),
    Detailed {
        name: String,
        #[serde(default)]
        src: Option<PathBuf>,
    },
}

impl TryFrom<RawImageEntry> for ImageEntry {
    type Error = ParseImageNameError;

    fn try_from(raw: RawImageEntry) -> Result<Self, Self::Error> {
        match raw {
            RawImageEntry::Simple(name) => Ok(ImageEntry::Simple(ImageName::parse(&name)?)),
            RawImageEntry::Detailed { name, src } => Ok(ImageEntry::Detailed {
                name: ImageName::parse(&name)?,
                src,
            }),
        }
    }
}
