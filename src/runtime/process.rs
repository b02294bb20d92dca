// ABOUTME: Local process and filesystem capabilities backed by tokio.
// ABOUTME: Runs the archive command and streams the resulting archive from disk.

use super::traits::{CommandOutput, CommandRunner, ContextFiles, ContextStream, Invocation};
use async_trait::async_trait;
use bytes::BytesMut;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;

const READ_CHUNK: usize = 64 * 1024;

/// Runs commands with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args).stdin(Stdio::null());
        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(
            program = %invocation.program,
            args = ?invocation.args,
            cwd = ?invocation.current_dir,
            "running command"
        );

        let output = cmd.output().await?;
        Ok(CommandOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Opens files with `tokio::fs` and reads them in fixed-size chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioContextFiles;

#[async_trait]
impl ContextFiles for TokioContextFiles {
    async fn open_read(&self, path: &Path) -> std::io::Result<ContextStream> {
        let file = tokio::fs::File::open(path).await?;

        let stream = futures::stream::try_unfold(file, |mut file| async move {
            let mut buf = BytesMut::with_capacity(READ_CHUNK);
            let n = file.read_buf(&mut buf).await?;
            let next = if n == 0 {
                None
            } else {
                Some((buf.freeze(), file))
            };
            Ok::<_, std::io::Error>(next)
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.tar");
        let contents = vec![7u8; READ_CHUNK * 2 + 11];
        std::fs::write(&path, &contents).unwrap();

        let chunks: Vec<_> = TokioContextFiles
            .open_read(&path)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        let read: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(read, contents);
    }

    #[tokio::test]
    async fn missing_file_fails_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let result = TokioContextFiles.open_read(&dir.path().join("nope.tar")).await;
        assert_eq!(result.err().map(|e| e.kind()), Some(std::io::ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn runs_in_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = Invocation::new("pwd").current_dir(dir.path());

        let output = TokioCommandRunner.run(&invocation).await.unwrap();

        assert!(output.success());
        let printed = String::from_utf8(output.stdout).unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            Path::new(printed.trim()).canonicalize().unwrap(),
            expected
        );
    }

    #[tokio::test]
    async fn reports_exit_code() {
        let output = TokioCommandRunner
            .run(&Invocation::new("sh").arg("-c").arg("exit 3"))
            .await
            .unwrap();
        assert_eq!(output.status, Some(3));
        assert!(!output.success());
    }
}
