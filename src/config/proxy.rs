// ABOUTME: Display-forwarding proxy settings.
// ABOUTME: Controls whether the ssh invocation is wrapped by a tool such as waypipe.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PROXY_PROGRAM: &str = "waypipe";

/// How the display proxy wrapper is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    /// Wrap when the program is on PATH, otherwise connect without it.
    #[default]
    Auto,
    /// Wrap, and fail if the program cannot be found.
    Required,
    /// Never wrap.
    Disabled,
}

impl fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProxyMode::Auto => "auto",
            ProxyMode::Required => "required",
            ProxyMode::Disabled => "disabled",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayProxyConfig {
    pub program: String,
    pub mode: ProxyMode,
}

impl Default for DisplayProxyConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROXY_PROGRAM.to_string(),
            mode: ProxyMode::Auto,
        }
    }
}
