// ABOUTME: Runtime socket detection on the local system.
// ABOUTME: Honors explicit config and DOCKER_HOST, then checks Podman sockets before Docker.

use super::types::{RuntimeConfig, RuntimeInfo, RuntimeType};
use std::path::Path;

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("unsupported DOCKER_HOST (only unix:// sockets are supported): {0}")]
    UnsupportedHost(String),
}

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Detect the container runtime on the local system.
///
/// Resolution order:
/// 1. Explicit `runtime` and/or `socket` from config
/// 2. `DOCKER_HOST` when it names a `unix://` socket
/// 3. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 4. Rootful Podman socket (`/run/podman/podman.sock`)
/// 5. Docker socket (`/var/run/docker.sock`)
pub fn detect_runtime(config: Option<&RuntimeConfig>) -> Result<RuntimeInfo, DetectionError> {
    let docker_host = std::env::var("DOCKER_HOST").ok();
    detect_with(config, docker_host.as_deref(), get_uid().as_deref(), |p| {
        p.exists()
    })
}

fn detect_with(
    config: Option<&RuntimeConfig>,
    docker_host: Option<&str>,
    uid: Option<&str>,
    exists: impl Fn(&Path) -> bool,
) -> Result<RuntimeInfo, DetectionError> {
    if let Some(cfg) = config {
        match (cfg.runtime, cfg.socket.as_ref()) {
            (Some(runtime_type), socket) => {
                return Ok(RuntimeInfo {
                    runtime_type,
                    socket_path: socket
                        .cloned()
                        .unwrap_or_else(|| default_socket_path(runtime_type)),
                });
            }
            (None, Some(socket)) => {
                return Ok(RuntimeInfo {
                    runtime_type: guess_runtime(socket),
                    socket_path: socket.clone(),
                });
            }
            (None, None) => {}
        }
    }

    if let Some(host) = docker_host.filter(|h| !h.is_empty()) {
        let socket = host
            .strip_prefix("unix://")
            .ok_or_else(|| DetectionError::UnsupportedHost(host.to_string()))?;
        return Ok(RuntimeInfo {
            runtime_type: guess_runtime(socket),
            socket_path: socket.to_string(),
        });
    }

    if let Some(uid) = uid {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if exists(Path::new(&rootless_socket)) {
            return Ok(RuntimeInfo {
                runtime_type: RuntimeType::Podman,
                socket_path: rootless_socket,
            });
        }
    }

    if exists(Path::new(ROOTFUL_PODMAN)) {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Podman,
            socket_path: ROOTFUL_PODMAN.to_string(),
        });
    }

    if exists(Path::new(DOCKER_SOCKET)) {
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Docker,
            socket_path: DOCKER_SOCKET.to_string(),
        });
    }

    Err(DetectionError::NoRuntimeFound)
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn guess_runtime(socket: &str) -> RuntimeType {
    if socket.contains("podman") {
        RuntimeType::Podman
    } else {
        RuntimeType::Docker
    }
}

fn default_socket_path(runtime: RuntimeType) -> String {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET.to_string(),
        RuntimeType::Podman => ROOTFUL_PODMAN.to_string(),
    }
}
