// ABOUTME: Local port forward specifications for the SSH session.
// ABOUTME: Parses "local:host:remote" and "local:remote" forms into typed triples.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Remote host used when a forward omits one.
pub const DEFAULT_FORWARD_HOST: &str = "127.0.0.1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForwardSpecError {
    #[error("forward cannot be empty")]
    Empty,

    #[error("forward must look like LOCAL:HOST:REMOTE or LOCAL:REMOTE, got '{0}'")]
    Malformed(String),

    #[error("invalid port in forward: '{0}'")]
    InvalidPort(String),

    #[error("forward remote host cannot be empty")]
    EmptyHost,
}

/// One `-L` tunnel: a local TCP port bound on the client, forwarded to
/// `remote_host:remote_port` as seen from inside the remote machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardSpec {
    pub local_port: u16,
    pub remote_host: String,
    pub remote_port: u16,
}

impl ForwardSpec {
    pub fn new(local_port: u16, remote_host: impl Into<String>, remote_port: u16) -> Self {
        Self {
            local_port,
            remote_host: remote_host.into(),
            remote_port,
        }
    }

    /// Forward a port to the same port on the remote loopback interface.
    pub fn loopback(port: u16) -> Self {
        Self::new(port, DEFAULT_FORWARD_HOST, port)
    }

    pub fn parse(s: &str) -> Result<Self, ForwardSpecError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ForwardSpecError::Empty);
        }

        let parts: Vec<&str> = s.split(':').collect();
        let (local, host, remote) = match parts.as_slice() {
            [local, remote] => (*local, DEFAULT_FORWARD_HOST, *remote),
            [local, host, remote] => (*local, *host, *remote),
            _ => return Err(ForwardSpecError::Malformed(s.to_string())),
        };

        if host.is_empty() {
            return Err(ForwardSpecError::EmptyHost);
        }

        Ok(Self {
            local_port: parse_forward_port(local)?,
            remote_host: host.to_string(),
            remote_port: parse_forward_port(remote)?,
        })
    }

    /// Check a spec built from a mapping rather than parsed from a string.
    pub fn validate(&self) -> Result<(), ForwardSpecError> {
        if self.local_port == 0 {
            return Err(ForwardSpecError::InvalidPort("0".to_string()));
        }
        if self.remote_port == 0 {
            return Err(ForwardSpecError::InvalidPort("0".to_string()));
        }
        if self.remote_host.trim().is_empty() {
            return Err(ForwardSpecError::EmptyHost);
        }
        Ok(())
    }
}

fn parse_forward_port(s: &str) -> Result<u16, ForwardSpecError> {
    match s.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ForwardSpecError::InvalidPort(s.to_string())),
    }
}

/// Renders the exact value handed to `ssh -L`.
impl fmt::Display for ForwardSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.local_port, self.remote_host, self.remote_port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_form() {
        let spec = ForwardSpec::parse("9050:10.0.0.2:9051").unwrap();
        assert_eq!(spec, ForwardSpec::new(9050, "10.0.0.2", 9051));
    }

    #[test]
    fn short_form_uses_loopback() {
        let spec = ForwardSpec::parse("8080:80").unwrap();
        assert_eq!(spec.remote_host, "127.0.0.1");
        assert_eq!(spec.local_port, 8080);
        assert_eq!(spec.remote_port, 80);
    }

    #[test]
    fn display_matches_ssh_syntax() {
        assert_eq!(ForwardSpec::loopback(9050).to_string(), "9050:127.0.0.1:9050");
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(ForwardSpec::parse("  "), Err(ForwardSpecError::Empty));
        assert!(matches!(
            ForwardSpec::parse("9050"),
            Err(ForwardSpecError::Malformed(_))
        ));
        assert!(matches!(
            ForwardSpec::parse("a:b:c:d"),
            Err(ForwardSpecError::Malformed(_))
        ));
        assert!(matches!(
            ForwardSpec::parse("0:9050"),
            Err(ForwardSpecError::InvalidPort(_))
        ));
        assert!(matches!(
            ForwardSpec::parse("9050:host:70000"),
            Err(ForwardSpecError::InvalidPort(_))
        ));
        assert_eq!(ForwardSpec::parse("1::2"), Err(ForwardSpecError::EmptyHost));
    }

    #[test]
    fn validate_catches_zero_ports() {
        assert!(ForwardSpec::new(0, "localhost", 1).validate().is_err());
        assert!(ForwardSpec::new(1, " ", 1).validate().is_err());
        assert!(ForwardSpec::loopback(22).validate().is_ok());
    }
}
