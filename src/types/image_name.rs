// ABOUTME: Container image name validation.
// ABOUTME: Accepts forms like nginx, nginx:tag, registry:5000/org/image:tag@digest.

use serde::{Deserialize, Deserializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseImageNameError {
    #[error("image name cannot be empty")]
    Empty,

    #[error("invalid character in image name: {0}")]
    InvalidChar(char),

    #[error("invalid image name format: {0}")]
    InvalidFormat(String),
}

/// A daemon-recognized image identifier such as `repository:tag`.
///
/// The name is kept exactly as given; no `:latest` tag is appended here.
/// Defaulting a missing tag is left to the daemon client at request time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName(String);

impl ImageName {
    pub fn parse(input: &str) -> Result<Self, ParseImageNameError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageNameError::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric()
                && c != '/'
                && c != ':'
                && c != '.'
                && c != '-'
                && c != '_'
                && c != '@'
            {
                return Err(ParseImageNameError::InvalidChar(c));
            }
        }

        let without_digest = match input.split_once('@') {
            Some((_, "")) => return Err(ParseImageNameError::InvalidFormat(input.to_string())),
            Some((before, _)) => before,
            None => input,
        };

        if without_digest.is_empty()
            || without_digest.ends_with(':')
            || without_digest.starts_with('/')
            || without_digest.ends_with('/')
            || without_digest.contains("//")
        {
            return Err(ParseImageNameError::InvalidFormat(input.to_string()));
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digest portion (`sha256:...`), if one was given.
    pub fn digest(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, digest)| digest)
    }

    /// The tag portion, if one was given explicitly.
    pub fn tag(&self) -> Option<&str> {
        let without_digest = self.0.split('@').next().unwrap_or(&self.0);
        match without_digest.rsplit_once(':') {
            // A colon followed by a slash belongs to a registry port.
            Some((_, after)) if !after.contains('/') => Some(after),
            _ => None,
        }
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ImageName {
    type Err = ParseImageNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for ImageName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ImageName::parse(&s).map_err(serde::de::Error::custom)
    }
}
