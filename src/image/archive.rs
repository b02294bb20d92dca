// ABOUTME: Build context archiving.
// ABOUTME: Tars a context directory into <src>/archive.tar using the external tar command.

use std::path::{Path, PathBuf};

use super::ImageError;
use crate::runtime::traits::{CommandRunner, Invocation};

/// Fixed name of the archive written inside the build context.
pub const ARCHIVE_FILENAME: &str = "archive.tar";

/// Where the archive for `src` is written.
pub fn archive_path(src: &Path) -> PathBuf {
    src.join(ARCHIVE_FILENAME)
}

/// The tar invocation for `src`.
///
/// Runs with `src` as the child's working directory so member paths are
/// relative to the context root. The archive excludes itself.
pub fn archive_invocation(src: &Path) -> Invocation {
    Invocation::new("tar")
        .arg(format!("--exclude={}", ARCHIVE_FILENAME))
        .arg("-cf")
        .arg(ARCHIVE_FILENAME)
        .arg(".")
        .current_dir(src)
}

/// Create the archive for `src` and return its path.
pub async fn create_archive<R>(runner: &R, src: &Path) -> Result<PathBuf, ImageError>
where
    R: CommandRunner + ?Sized,
{
    let invocation = archive_invocation(src);

    let output = runner
        .run(&invocation)
        .await
        .map_err(|e| ImageError::Archive {
            dir: src.to_path_buf(),
            reason: format!("failed to run {}: {}", invocation.program, e),
        })?;

    if !output.success() {
        let status = match output.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let reason = if stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, stderr)
        };
        return Err(ImageError::Archive {
            dir: src.to_path_buf(),
            reason,
        });
    }

    Ok(archive_path(src))
}
