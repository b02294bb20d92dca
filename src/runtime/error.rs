// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Unifies detection and connection errors for programmatic handling.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::DaemonStatusError;

/// Unified runtime error for detection and connection failures.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("runtime detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("runtime connection failed: {source}"))]
    Connection { source: DaemonStatusError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// No container runtime found on the system.
    NoRuntimeFound,
    /// DOCKER_HOST points somewhere we cannot reach.
    UnsupportedHost,
    /// Failed to connect to runtime socket.
    ConnectionFailed,
}

impl RuntimeError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection { source } => match source {
                DetectionError::NoRuntimeFound => RuntimeErrorKind::NoRuntimeFound,
                DetectionError::UnsupportedHost(_) => RuntimeErrorKind::UnsupportedHost,
            },
            RuntimeError::Connection {
                source: DaemonStatusError::ConnectionFailed(_),
            } => RuntimeErrorKind::ConnectionFailed,
        }
    }

    /// What the user can change to get past this error.
    pub fn hint(&self) -> &'static str {
        match self.kind() {
            RuntimeErrorKind::NoRuntimeFound => {
                "start Docker or Podman, or set `socket:` in hoist.yml"
            }
            RuntimeErrorKind::UnsupportedHost => {
                "set DOCKER_HOST=unix:///path/to/docker.sock, or set `socket:` in hoist.yml"
            }
            RuntimeErrorKind::ConnectionFailed => {
                "check that the daemon is running and the socket is readable by this user"
            }
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}

impl From<DaemonStatusError> for RuntimeError {
    fn from(source: DaemonStatusError) -> Self {
        RuntimeError::Connection { source }
    }
}
