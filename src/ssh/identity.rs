// ABOUTME: Private key discovery from the user's SSH client configuration.
// ABOUTME: Configured IdentityFile entries are tried first, the override second.

use super::client::SshConfigSource;
use crate::config::SSH_KEY_PATH_VAR;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// IdentityFile paths in configuration order. The first existing one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityCandidates(Vec<PathBuf>);

impl IdentityCandidates {
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first_existing<F>(&self, exists: F) -> Option<&Path>
    where
        F: Fn(&Path) -> bool,
    {
        first_existing(&self.0, exists)
    }
}

/// Collect every `identityfile` line of an `ssh -G` dump, with `~` expanded.
pub fn parse_identity_files(dump: &str) -> IdentityCandidates {
    let paths = dump
        .lines()
        .filter_map(|line| {
            let (keyword, value) = line.trim().split_once(char::is_whitespace)?;
            if !keyword.eq_ignore_ascii_case("identityfile") {
                return None;
            }
            let value = value.trim();
            (!value.is_empty()).then(|| expand_tilde(value))
        })
        .collect();
    IdentityCandidates(paths)
}

/// Expand a leading `~` or `~/` to the current user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// First candidate for which `exists` holds, in order.
pub fn first_existing<F>(candidates: &[PathBuf], exists: F) -> Option<&Path>
where
    F: Fn(&Path) -> bool,
{
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|path| exists(path))
}

/// Pick the private key to authenticate with.
///
/// The configuration of `reference_host` is consulted first; only when none
/// of its IdentityFile entries exist is `override_path` tried.
pub fn resolve_identity_file<S, F>(
    source: &S,
    reference_host: &str,
    override_path: Option<&Path>,
    exists: F,
    diagnostics: &mut Diagnostics,
) -> Result<PathBuf>
where
    S: SshConfigSource + ?Sized,
    F: Fn(&Path) -> bool,
{
    let candidates = parse_identity_files(&source.dump(reference_host)?);
    tracing::debug!(
        host = reference_host,
        candidates = ?candidates.paths(),
        "identity files from ssh configuration"
    );

    if let Some(path) = candidates.first_existing(&exists) {
        return Ok(path.to_path_buf());
    }

    diagnostics.warn(Warning::identity_fallback(format!(
        "none of the keys configured for {reference_host} exist; falling back to {SSH_KEY_PATH_VAR}"
    )));

    let no_identity = || Error::NoIdentityFile {
        reference_host: reference_host.to_string(),
        override_var: SSH_KEY_PATH_VAR.to_string(),
    };

    let path = override_path
        .map(|p| expand_tilde(&p.to_string_lossy()))
        .ok_or_else(no_identity)?;

    if exists(&path) {
        Ok(path)
    } else {
        tracing::debug!("override {} does not exist", path.display());
        Err(no_identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FixedDump(&'static str);

    impl SshConfigSource for FixedDump {
        fn dump(&self, _host: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn existing(paths: &[&str]) -> impl Fn(&Path) -> bool {
        let set: HashSet<PathBuf> = paths.iter().map(PathBuf::from).collect();
        move |p| set.contains(p)
    }

    const DUMP: &str = "user git\nhostname github.com\nport 22\n\
        identityfile /keys/missing\nIdentityFile /keys/present\nidentitiesonly no\n";

    #[test]
    fn parse_keeps_configuration_order() {
        let candidates = parse_identity_files(DUMP);
        assert_eq!(
            candidates.paths(),
            &[PathBuf::from("/keys/missing"), PathBuf::from("/keys/present")]
        );
    }

    #[test]
    fn parse_ignores_similar_keywords_and_blank_values() {
        let candidates =
            parse_identity_files("identitiesonly yes\nidentityfile\nidentityagent /run/agent\n");
        assert!(candidates.is_empty());
    }

    #[test]
    fn parse_keeps_spaces_inside_paths() {
        let candidates = parse_identity_files("identityfile /keys/my key\n");
        assert_eq!(candidates.paths(), &[PathBuf::from("/keys/my key")]);
    }

    #[test]
    fn expand_tilde_with_home() {
        let expanded = expand_tilde("~/.ssh/id_ed25519");
        assert!(!expanded.starts_with("~"), "{}", expanded.display());
        assert!(expanded.ends_with(".ssh/id_ed25519"));
    }

    #[test]
    fn expand_tilde_absolute_path() {
        assert_eq!(expand_tilde("/etc/ssh/key"), PathBuf::from("/etc/ssh/key"));
    }

    #[test]
    fn second_candidate_wins_when_first_is_missing() {
        let mut diag = Diagnostics::default();
        let path = resolve_identity_file(
            &FixedDump(DUMP),
            "github.com",
            Some(Path::new("/keys/override")),
            existing(&["/keys/present", "/keys/override"]),
            &mut diag,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/keys/present"));
        assert!(!diag.has_warnings());
    }

    #[test]
    fn configured_key_takes_precedence_over_override() {
        let mut diag = Diagnostics::default();
        let path = resolve_identity_file(
            &FixedDump("identityfile /keys/a\n"),
            "github.com",
            Some(Path::new("/keys/override")),
            existing(&["/keys/a", "/keys/override"]),
            &mut diag,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/keys/a"));
    }

    #[test]
    fn override_used_when_nothing_configured() {
        let mut diag = Diagnostics::default();
        let path = resolve_identity_file(
            &FixedDump("user git\n"),
            "github.com",
            Some(Path::new("/keys/override")),
            existing(&["/keys/override"]),
            &mut diag,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/keys/override"));
        assert!(diag.has_warnings());
    }

    #[test]
    fn override_is_tilde_expanded_before_existence_check() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let expected = home.join("k");
        let seen = std::cell::RefCell::new(Vec::new());
        let mut diag = Diagnostics::default();

        let path = resolve_identity_file(
            &FixedDump("user git\n"),
            "github.com",
            Some(Path::new("~/k")),
            |p: &Path| {
                seen.borrow_mut().push(p.to_path_buf());
                p == expected.as_path()
            },
            &mut diag,
        )
        .unwrap();

        assert_eq!(path, expected);
        assert_eq!(seen.into_inner(), vec![expected]);
    }

    #[test]
    fn unset_override_is_no_identity_error() {
        let mut diag = Diagnostics::default();
        let err = resolve_identity_file(
            &FixedDump(DUMP),
            "github.com",
            None,
            existing(&[]),
            &mut diag,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoIdentityFile { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn dangling_override_is_no_identity_error() {
        let mut diag = Diagnostics::default();
        let err = resolve_identity_file(
            &FixedDump(""),
            "github.com",
            Some(Path::new("/keys/gone")),
            existing(&[]),
            &mut diag,
        )
        .unwrap_err();
        assert!(err.to_string().contains("SSH_KEY_PATH"));
    }
}
