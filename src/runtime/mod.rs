// ABOUTME: Container runtime access: detection, daemon client, local process and files.
// ABOUTME: Auto-detects an available socket or uses explicit config.

mod daemon;
mod detection;
mod error;
mod process;
pub mod traits;
mod types;

pub use daemon::DockerDaemon;
pub use detection::{DetectionError, detect_runtime};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use process::{TokioCommandRunner, TokioContextFiles};
pub use types::{RuntimeConfig, RuntimeInfo, RuntimeType};
