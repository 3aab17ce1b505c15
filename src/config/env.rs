// ABOUTME: Environment variable overrides layered on top of file configuration.
// ABOUTME: Lookups go through a closure so tests never touch the process environment.

use std::path::PathBuf;

use super::{Config, ProxyMode, parse_port};
use crate::error::Result;

/// Path to a private key used when no configured IdentityFile exists.
pub const SSH_KEY_PATH_VAR: &str = "SSH_KEY_PATH";
pub const HOST_VAR: &str = "STITCH_HOST";
pub const PORT_VAR: &str = "STITCH_PORT";
pub const USER_VAR: &str = "STITCH_USER";
/// Truthy values disable the display proxy wrapper.
pub const NO_DISPLAY_PROXY_VAR: &str = "STITCH_NO_DISPLAY_PROXY";

impl Config {
    /// Apply environment overrides. Unset and empty variables leave the
    /// current value untouched.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(SSH_KEY_PATH_VAR) {
            self.identity_file = Some(PathBuf::from(path));
        }
        if let Some(host) = get(HOST_VAR) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = get(PORT_VAR) {
            self.port = parse_port(&port, PORT_VAR)?;
        }
        if let Some(user) = get(USER_VAR) {
            self.user = user.trim().to_string();
        }
        if get(NO_DISPLAY_PROXY_VAR).is_some_and(|v| is_truthy(&v)) {
            tracing::debug!("display proxy disabled by {}", NO_DISPLAY_PROXY_VAR);
            self.display_proxy.mode = ProxyMode::Disabled;
        }

        Ok(())
    }
}

pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
