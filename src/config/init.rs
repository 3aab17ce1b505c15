// ABOUTME: Config scaffolding for first-time setup.
// ABOUTME: Writes a commented config.yml template seeded with the defaults.

use std::path::Path;

use crate::error::{Error, Result};

use super::{Config, NO_DISPLAY_PROXY_VAR, SSH_KEY_PATH_VAR};

pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, generate_template_yaml(&Config::default()))?;
    tracing::debug!("wrote configuration template to {}", path.display());
    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let forwards: String = config
        .forwards
        .iter()
        .map(|f| format!("  - \"{f}\"\n"))
        .collect();

    format!(
        r#"# Host whose `ssh -G` IdentityFile entries select the private key
reference_host: {}
host: {}
port: {}
user: {}
# Local port forwards, LOCAL:HOST:REMOTE (HOST is resolved on the server)
forwards:
{}# Used when no configured IdentityFile exists; {} overrides it
# identity_file: ~/.ssh/id_ed25519
display_proxy:
  program: {}
  # auto | required | disabled ({} disables it too)
  mode: {}
"#,
        config.reference_host,
        config.host,
        config.port,
        config.user,
        forwards,
        SSH_KEY_PATH_VAR,
        config.display_proxy.program,
        NO_DISPLAY_PROXY_VAR,
        config.display_proxy.mode,
    )
}
