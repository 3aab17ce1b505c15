// ABOUTME: Connection target and resolved session types.
// ABOUTME: Builds the ssh argument vector and runs it attached to the terminal.

use super::client::SshConfigSource;
use super::executable::find_executable;
use super::identity::resolve_identity_file;
use crate::config::{Config, DisplayProxyConfig, ForwardSpec, ProxyMode};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where to connect and which tunnels to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub forwards: Vec<ForwardSpec>,
}

impl ConnectionTarget {
    /// The `user@host` argument.
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

pub fn resolve_target(config: &Config) -> ConnectionTarget {
    ConnectionTarget {
        host: config.host.clone(),
        port: config.port,
        user: config.user.clone(),
        forwards: config.forwards.clone(),
    }
}

/// Decide whether to wrap ssh in the display proxy, looking the program up
/// in `search_path` (a PATH-style list).
pub fn resolve_display_proxy(
    proxy: &DisplayProxyConfig,
    search_path: Option<&OsStr>,
) -> Result<Option<PathBuf>> {
    if proxy.mode == ProxyMode::Disabled {
        return Ok(None);
    }

    match find_executable(&proxy.program, search_path) {
        Some(path) => Ok(Some(path)),
        None if proxy.mode == ProxyMode::Required => Err(Error::DependencyMissing {
            executable: proxy.program.clone(),
            search_path: search_path
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }),
        None => {
            tracing::debug!("{} not on PATH, connecting without it", proxy.program);
            Ok(None)
        }
    }
}

/// Everything needed to open the session. Consumed by [`ResolvedSession::launch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSession {
    key_path: PathBuf,
    target: ConnectionTarget,
    proxy_wrapper: Option<PathBuf>,
}

impl ResolvedSession {
    pub fn new(
        key_path: PathBuf,
        target: ConnectionTarget,
        proxy_wrapper: Option<PathBuf>,
    ) -> Self {
        Self {
            key_path,
            target,
            proxy_wrapper,
        }
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    pub fn proxy_wrapper(&self) -> Option<&Path> {
        self.proxy_wrapper.as_deref()
    }

    /// `[proxy] ssh -i KEY -p PORT (-L FORWARD)* user@host`
    pub fn command_line(&self, ssh: impl AsRef<OsStr>) -> Vec<OsString> {
        let mut argv: Vec<OsString> = Vec::with_capacity(6 + 2 * self.target.forwards.len());

        if let Some(proxy) = &self.proxy_wrapper {
            argv.push(proxy.clone().into_os_string());
        }
        argv.push(ssh.as_ref().to_os_string());
        argv.push("-i".into());
        argv.push(self.key_path.clone().into_os_string());
        argv.push("-p".into());
        argv.push(self.target.port.to_string().into());
        for forward in &self.target.forwards {
            argv.push("-L".into());
            argv.push(forward.to_string().into());
        }
        argv.push(self.target.destination().into());

        argv
    }

    /// Run the session attached to the caller's stdio and wait for it to end.
    /// Returns the child's exit code; a child killed by a signal counts as 1.
    pub fn launch(self, ssh: impl AsRef<OsStr>) -> Result<i32> {
        let argv = self.command_line(ssh);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::Configuration("empty command line".to_string()))?;

        tracing::debug!(program = ?program, "launching interactive session");
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| Error::Launch {
                program: program.to_string_lossy().into_owned(),
                source,
            })?;

        tracing::debug!(%status, "session ended");
        Ok(status.code().unwrap_or(1))
    }
}

/// Resolve identity, target, and proxy wrapper for one invocation.
/// `search_path` is where the display proxy is looked up.
pub fn resolve_session<S>(
    config: &Config,
    source: &S,
    search_path: Option<&OsStr>,
    diagnostics: &mut Diagnostics,
) -> Result<ResolvedSession>
where
    S: SshConfigSource + ?Sized,
{
    let proxy_wrapper = resolve_display_proxy(&config.display_proxy, search_path)?;

    let key_path = resolve_identity_file(
        source,
        &config.reference_host,
        config.identity_file.as_deref(),
        |path| path.is_file(),
        diagnostics,
    )?;

    Ok(ResolvedSession::new(
        key_path,
        resolve_target(config),
        proxy_wrapper,
    ))
}

/// Render an argument vector for display.
pub fn display_command(argv: &[OsString]) -> String {
    argv.iter()
        .map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("'{arg}'")
            } else {
                arg.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
