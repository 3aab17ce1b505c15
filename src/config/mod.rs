// ABOUTME: Layered configuration for the connection resolver.
// ABOUTME: Defaults, then an optional YAML file, then environment overrides.

mod deserialize;
mod env;
mod forward;
mod init;
mod proxy;

pub use env::{
    HOST_VAR, NO_DISPLAY_PROXY_VAR, PORT_VAR, SSH_KEY_PATH_VAR, USER_VAR, is_truthy,
};
pub use forward::{DEFAULT_FORWARD_HOST, ForwardSpec, ForwardSpecError};
pub use init::init_config;
pub use proxy::{DEFAULT_PROXY_PROGRAM, DisplayProxyConfig, ProxyMode};

use crate::error::{Error, Result};
use deserialize::deserialize_forwards;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "stitch-remote";
pub const CONFIG_FILENAME: &str = "config.yml";

pub const DEFAULT_REFERENCE_HOST: &str = "github.com";
pub const DEFAULT_HOST: &str = "stitch.jmcateer.com";
pub const DEFAULT_PORT: u16 = 92;
pub const DEFAULT_USER: &str = "user";
pub const DEFAULT_FORWARD_PORTS: [u16; 2] = [9050, 8080];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Host whose `ssh -G` output is searched for IdentityFile entries.
    pub reference_host: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(deserialize_with = "deserialize_forwards")]
    pub forwards: Vec<ForwardSpec>,
    /// Key used when none of the configured IdentityFile entries exist.
    pub identity_file: Option<PathBuf>,
    pub display_proxy: DisplayProxyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_host: DEFAULT_REFERENCE_HOST.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            forwards: DEFAULT_FORWARD_PORTS
                .iter()
                .map(|&port| ForwardSpec::loopback(port))
                .collect(),
            identity_file: None,
            display_proxy: DisplayProxyConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // A document with no keys means "all defaults".
        let has_content = yaml.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        });
        if !has_content {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Self::from_yaml(&content)
    }

    /// Per-user configuration file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
    }

    /// Read the file layer. An explicit path must exist; the per-user default
    /// is optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Defaults, then the file layer, then the process environment.
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::discover(explicit)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Configuration("host cannot be empty".to_string()));
        }
        if self.user.trim().is_empty() {
            return Err(Error::Configuration("user cannot be empty".to_string()));
        }
        if self.reference_host.trim().is_empty() {
            return Err(Error::Configuration(
                "reference_host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(Error::Configuration(
                "port must be a positive integer".to_string(),
            ));
        }
        if self.display_proxy.program.trim().is_empty()
            && self.display_proxy.mode != ProxyMode::Disabled
        {
            return Err(Error::Configuration(
                "display_proxy.program cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a port from user input, naming where it came from on failure.
pub fn parse_port(value: &str, source: &str) -> Result<u16> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(Error::Configuration(format!(
            "{source} must be a positive integer port, got '{}'",
            value.trim()
        ))),
    }
}
