// ABOUTME: Connection resolver for the system OpenSSH client.
// ABOUTME: Finds the private key, builds the target, and launches the session.

mod client;
mod executable;
mod identity;
mod session;

pub use client::{OpenSsh, SSH_PROGRAM, SshConfigSource};
pub use executable::{find_executable, require_executable};
pub use identity::{
    IdentityCandidates, expand_tilde, first_existing, parse_identity_files, resolve_identity_file,
};
pub use session::{
    ConnectionTarget, ResolvedSession, display_command, resolve_display_proxy, resolve_session,
    resolve_target,
};
