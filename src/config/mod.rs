// ABOUTME: Configuration types and parsing for hoist.yml.
// ABOUTME: Handles discovery, YAML parsing and build context path resolution.

mod image_entry;
mod init;

pub use image_entry::ImageEntry;
pub use init::init_config;

use crate::error::{Error, Result};
use crate::runtime::{RuntimeConfig, RuntimeType};
use crate::types::Image;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "hoist.yml";
pub const CONFIG_FILENAME_ALT: &str = "hoist.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".hoist/config.yml";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub runtime: Option<RuntimeType>,
    pub socket: Option<String>,
    pub images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    runtime: Option<RuntimeType>,
    #[serde(default)]
    socket: Option<String>,
    #[serde(default)]
    images: Vec<ImageEntry>,
}

impl Config {
    /// Parse YAML, resolving relative build contexts against `base`.
    pub fn from_yaml_in(yaml: &str, base: &Path) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;

        let mut seen = HashSet::new();
        for entry in &raw.images {
            if !seen.insert(entry.name().as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "image listed more than once: {}",
                    entry.name()
                )));
            }
        }

        Ok(Config {
            runtime: raw.runtime,
            socket: raw.socket,
            images: raw
                .images
                .into_iter()
                .map(|entry| entry.into_image(base))
                .collect(),
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_yaml_in(yaml, Path::new("."))
    }

    /// Load a config file; relative paths are taken from its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let base = path.parent().unwrap_or(Path::new("."));
        Self::load_in(path, base)
    }

    fn load_in(path: &Path, base: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_in(&content, base)
    }

    /// Find the config in `dir`. Relative paths resolve against `dir`,
    /// including for `.hoist/config.yml`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load_in(path, dir);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn image(&self, name: &str) -> Result<&Image> {
        self.images
            .iter()
            .find(|image| image.name().as_str() == name)
            .ok_or_else(|| Error::UnknownImage(name.to_string()))
    }

    /// Images that have a build context.
    pub fn buildable(&self) -> Vec<Image> {
        self.images
            .iter()
            .filter(|image| image.src().is_some())
            .cloned()
            .collect()
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            runtime: self.runtime,
            socket: self.socket.clone(),
        }
    }
}
