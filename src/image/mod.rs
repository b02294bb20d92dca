// ABOUTME: Image transfer: pull by name and build from a local context.
// ABOUTME: Both reduce the daemon's chunked JSON progress stream to a single result.

mod archive;
mod error;
mod reducer;
mod service;

pub use archive::{ARCHIVE_FILENAME, archive_invocation, archive_path, create_archive};
pub use error::{BatchError, ImageError, ImageErrorKind};
pub use reducer::{Outcome, StreamReducer, reduce};
pub use service::ImageService;
