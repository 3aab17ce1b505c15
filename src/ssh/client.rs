// ABOUTME: Wrapper around the system OpenSSH client binary.
// ABOUTME: Queries effective client configuration with `ssh -G`.

use super::executable::require_executable;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const SSH_PROGRAM: &str = "ssh";

/// Source of `ssh -G` style configuration dumps (`keyword value` per line).
pub trait SshConfigSource {
    fn dump(&self, host: &str) -> Result<String>;
}

/// The OpenSSH client found on the search path.
#[derive(Debug, Clone)]
pub struct OpenSsh {
    program: PathBuf,
}

impl OpenSsh {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate `ssh` on PATH, failing before any network activity if absent.
    pub fn locate() -> Result<Self> {
        let program = require_executable(SSH_PROGRAM)?;
        tracing::debug!("using ssh client at {}", program.display());
        Ok(Self::new(program))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl SshConfigSource for OpenSsh {
    fn dump(&self, host: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("-G")
            .arg(host)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Launch {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::SshConfigQuery {
                host: host.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
