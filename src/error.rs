// ABOUTME: Application-wide error types for stitch-remote.
// ABOUTME: Uses thiserror; every variant is fatal for the invocation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required executable is not on the search path.
    #[error(
        "cannot find {executable} on your PATH; install it and make sure the folder holding it is on your PATH (PATH is currently {search_path:?})"
    )]
    DependencyMissing {
        executable: String,
        search_path: String,
    },

    /// Neither the SSH configuration nor the override yielded a key that exists.
    #[error(
        "no usable identity file: no IdentityFile configured for {reference_host} exists and {override_var} does not point to an existing file"
    )]
    NoIdentityFile {
        reference_host: String,
        override_var: String,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("could not determine a configuration directory for this user")]
    NoConfigDir,

    #[error("`ssh -G {host}` failed: {stderr}")]
    SshConfigQuery { host: String, stderr: String },

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// True for failures caused by missing or unusable settings rather than
    /// missing tools or I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::NoIdentityFile { .. }
                | Error::Configuration(_)
                | Error::ConfigNotFound(_)
                | Error::Yaml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
