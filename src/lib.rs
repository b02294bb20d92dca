// ABOUTME: Library root for hoist - image pull and build over the daemon API.
// ABOUTME: The command-line binary is in main.rs.

pub mod config;
pub mod error;
pub mod image;
pub mod runtime;
pub mod types;
