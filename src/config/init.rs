// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates hoist.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ImageName;

use super::CONFIG_FILENAME;

const TEMPLATE_IMAGE: &str = "my-app:latest";

pub fn init_config(dir: &Path, image: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let name = ImageName::parse(image.unwrap_or(TEMPLATE_IMAGE))
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    std::fs::write(&config_path, generate_template_yaml(&name))?;
    tracing::debug!(path = %config_path.display(), "wrote config template");

    Ok(())
}

fn generate_template_yaml(name: &ImageName) -> String {
    format!(
        r#"# Container runtime (auto-detected when omitted)
# runtime: docker
# socket: /var/run/docker.sock
images:
  - name: {}
    # Build context directory, relative to this file.
    # Without it the image can only be pulled.
    # src: ./docker
"#,
        name
    )
}
