// ABOUTME: Pull and build operations over injected daemon, process and file capabilities.
// ABOUTME: Both obtain a progress stream from the daemon and reduce it to one result.

use super::archive::create_archive;
use super::reducer::reduce;
use super::{BatchError, ImageError};
use crate::runtime::traits::{BuildOptions, CommandRunner, ContextFiles, DaemonClient};
use crate::runtime::{TokioCommandRunner, TokioContextFiles};
use crate::types::Image;

/// Pulls and builds images.
///
/// Holds no per-call state: every call gets its own stream and buffer, so
/// concurrent calls (even for the same image) do not interact.
pub struct ImageService<D, R = TokioCommandRunner, F = TokioContextFiles> {
    daemon: D,
    runner: R,
    files: F,
}

impl<D: DaemonClient> ImageService<D> {
    /// Service using the local `tar` and filesystem.
    pub fn new(daemon: D) -> Self {
        Self::with_collaborators(daemon, TokioCommandRunner, TokioContextFiles)
    }
}

impl<D, R, F> ImageService<D, R, F>
where
    D: DaemonClient,
    R: CommandRunner,
    F: ContextFiles,
{
    pub fn with_collaborators(daemon: D, runner: R, files: F) -> Self {
        Self {
            daemon,
            runner,
            files,
        }
    }

    pub fn daemon(&self) -> &D {
        &self.daemon
    }

    /// Pull `image` by name.
    ///
    /// A daemon refusal is returned as `RequestRejected` before any stream is
    /// read; an error reported inside the stream comes back as `Daemon`.
    pub async fn pull(&self, image: &Image) -> Result<(), ImageError> {
        let name = image.name();
        tracing::debug!(image = %name, "pulling");

        let stream = self.daemon.pull(name).await?;
        reduce(stream).await.into_result()?;

        tracing::debug!(image = %name, "pull complete");
        Ok(())
    }

    /// Build `image` from its context directory, tagging it with its name.
    pub async fn build(&self, image: &Image) -> Result<(), ImageError> {
        let name = image.name();
        let src = image
            .src()
            .ok_or_else(|| ImageError::MissingContext(name.clone()))?;
        tracing::debug!(image = %name, src = %src.display(), "building");

        let archive = create_archive(&self.runner, src).await?;

        let context = self
            .files
            .open_read(&archive)
            .await
            .map_err(|source| ImageError::Context {
                path: archive.clone(),
                source,
            })?;

        let options = BuildOptions::tagged(name);
        let stream = self.daemon.build_image(context, &options).await?;
        reduce(stream).await.into_result()?;

        tracing::debug!(image = %name, "build complete");
        Ok(())
    }

    /// Pull each image in order, stopping at the first failure.
    pub async fn pull_all(&self, images: &[Image]) -> Result<(), BatchError> {
        for image in images {
            self.pull(image).await.map_err(|source| BatchError {
                image: image.name().clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Build each image in order, stopping at the first failure.
    pub async fn build_all(&self, images: &[Image]) -> Result<(), BatchError> {
        for image in images {
            self.build(image).await.map_err(|source| BatchError {
                image: image.name().clone(),
                source,
            })?;
        }
        Ok(())
    }
}
