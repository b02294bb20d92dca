// ABOUTME: Entry point for the hoist CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use hoist::config::{self, CONFIG_FILENAME, Config};
use hoist::error::{Error, Result};
use hoist::image::ImageService;
use hoist::runtime::traits::DaemonStatus;
use hoist::runtime::{DockerDaemon, RuntimeError, detect_runtime};
use hoist::types::{Image, ImageName};
use output::Output;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// One transfer at a time on a single-threaded reactor.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode());

    if let Err(e) = run(cli, &mut output).await {
        output.error(&e.to_string());
        if let Error::Runtime(runtime) = &e {
            output.hint(runtime.hint());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { image, force } => {
            config::init_config(&cwd, image.as_deref(), force)?;
            output.success(&format!("Created {}", CONFIG_FILENAME));
            Ok(())
        }
        Commands::Pull { name } => {
            let config = load_optional_config(&cwd)?;
            let images = pull_targets(config.as_ref(), name.as_deref())?;
            pull(config.as_ref(), &images, output).await
        }
        Commands::Build { name, src } => {
            let config = load_optional_config(&cwd)?;
            let images = build_targets(config.as_ref(), name.as_deref(), src)?;
            build(config.as_ref(), &images, output).await
        }
        Commands::Status => {
            let config = load_optional_config(&cwd)?;
            status(config.as_ref(), output).await
        }
    }
}

/// A missing config is fine: single images can be named on the command line.
fn load_optional_config(dir: &std::path::Path) -> Result<Option<Config>> {
    match Config::discover(dir) {
        Ok(config) => Ok(Some(config)),
        Err(Error::ConfigNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn pull_targets(config: Option<&Config>, name: Option<&str>) -> Result<Vec<Image>> {
    match name {
        Some(name) => {
            let image = match config.and_then(|c| c.image(name).ok()) {
                Some(image) => image.clone(),
                None => Image::named(ImageName::parse(name)?),
            };
            Ok(vec![image])
        }
        None => {
            let images = config.map(|c| c.images.clone()).unwrap_or_default();
            if images.is_empty() {
                return Err(Error::NoImages("pull"));
            }
            Ok(images)
        }
    }
}

fn build_targets(
    config: Option<&Config>,
    name: Option<&str>,
    src: Option<PathBuf>,
) -> Result<Vec<Image>> {
    match (name, src) {
        (Some(name), Some(src)) => Ok(vec![Image::with_context(ImageName::parse(name)?, src)]),
        (Some(name), None) => {
            let config = config.ok_or_else(|| Error::UnknownImage(name.to_string()))?;
            Ok(vec![config.image(name)?.clone()])
        }
        (None, _) => {
            let images = config.map(Config::buildable).unwrap_or_default();
            if images.is_empty() {
                return Err(Error::NoImages("build"));
            }
            Ok(images)
        }
    }
}

/// Detect the socket and make sure the daemon answers.
async fn connect(config: Option<&Config>) -> Result<DockerDaemon> {
    let runtime_config = config.map(Config::runtime_config);
    let info = detect_runtime(runtime_config.as_ref()).map_err(RuntimeError::from)?;
    tracing::debug!(
        runtime = %info.runtime_type,
        socket = %info.socket_path,
        "detected runtime"
    );

    let daemon = DockerDaemon::connect(&info).map_err(RuntimeError::from)?;
    daemon.ping().await.map_err(RuntimeError::from)?;
    Ok(daemon)
}

async fn pull(config: Option<&Config>, images: &[Image], output: &mut Output) -> Result<()> {
    let service = ImageService::new(connect(config).await?);
    output.start_timer();

    match images {
        [image] => {
            output.progress(&format!("→ Pulling {}...", image.name()));
            service.pull(image).await?;
            output.success(&format!("Pulled {}", image.name()));
        }
        _ => {
            output.progress(&format!("→ Pulling {} images...", images.len()));
            service.pull_all(images).await?;
            output.success(&format!("Pulled {} images", images.len()));
        }
    }
    Ok(())
}

async fn build(config: Option<&Config>, images: &[Image], output: &mut Output) -> Result<()> {
    let service = ImageService::new(connect(config).await?);
    output.start_timer();

    match images {
        [image] => {
            output.progress(&format!("→ Building {}...", image.name()));
            service.build(image).await?;
            output.success(&format!("Built {}", image.name()));
        }
        _ => {
            output.progress(&format!("→ Building {} images...", images.len()));
            service.build_all(images).await?;
            output.success(&format!("Built {} images", images.len()));
        }
    }
    Ok(())
}

async fn status(config: Option<&Config>, output: &Output) -> Result<()> {
    let daemon = connect(config).await?;
    let info = daemon.info().await.map_err(RuntimeError::from)?;

    output.detail("Runtime", &info.name);
    output.detail("Socket", daemon.socket_path());
    output.detail("Version", &info.version);
    output.detail("API version", &info.api_version);
    output.detail("Platform", &format!("{}/{}", info.os, info.arch));
    if let Some(config) = config {
        output.detail("Configured images", &config.images.len().to_string());
    }
    Ok(())
}
