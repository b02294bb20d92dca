// ABOUTME: Daemon status trait.
// ABOUTME: Query daemon version and metadata, or just check it answers.

use async_trait::async_trait;

/// Daemon metadata operations.
#[async_trait]
pub trait DaemonStatus: Send + Sync {
    /// Get daemon version and metadata.
    async fn info(&self) -> Result<DaemonMetadata, DaemonStatusError>;

    /// Ping the daemon to check connectivity.
    async fn ping(&self) -> Result<(), DaemonStatusError>;
}

/// What the daemon reports about itself.
#[derive(Debug, Clone)]
pub struct DaemonMetadata {
    /// Runtime name (Docker or Podman).
    pub name: String,
    /// Server version.
    pub version: String,
    /// API version the client speaks.
    pub api_version: String,
    pub os: String,
    pub arch: String,
}

/// Errors from daemon status operations.
#[derive(Debug, thiserror::Error)]
pub enum DaemonStatusError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}
