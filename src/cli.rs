// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use crate::output::OutputMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hoist")]
#[command(about = "Pull and build container images through the Docker daemon API")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only final results (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new hoist.yml configuration file
    Init {
        /// Image name to put in the template
        #[arg(long)]
        image: Option<String>,

        /// Overwrite an existing hoist.yml
        #[arg(long)]
        force: bool,
    },

    /// Pull an image, or every configured image
    Pull {
        /// Image name (repository:tag)
        name: Option<String>,
    },

    /// Build an image, or every configured image with a build context
    Build {
        /// Image name, used as the tag of the built image
        name: Option<String>,

        /// Build context directory (overrides hoist.yml)
        #[arg(long, requires = "name")]
        src: Option<PathBuf>,
    },

    /// Show the detected daemon and its version
    Status,
}
