// ABOUTME: Filesystem capability for opening build context archives.
// ABOUTME: Hands the archive to the daemon client as a byte stream.

use super::daemon::ContextStream;
use async_trait::async_trait;
use std::path::Path;

/// Opens readable streams over files.
#[async_trait]
pub trait ContextFiles: Send + Sync {
    /// Open `path` for a single forward read.
    async fn open_read(&self, path: &Path) -> std::io::Result<ContextStream>;
}
