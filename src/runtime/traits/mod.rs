// ABOUTME: Capability traits the image core depends on.
// ABOUTME: Defines DaemonClient, DaemonStatus, ContextFiles, CommandRunner.

mod command;
mod context;
mod daemon;
mod status;

pub use command::{CommandOutput, CommandRunner, Invocation};
pub use context::ContextFiles;
pub use daemon::{BuildOptions, ContextStream, DaemonClient, EventStream, RequestError};
pub use status::{DaemonMetadata, DaemonStatus, DaemonStatusError};
