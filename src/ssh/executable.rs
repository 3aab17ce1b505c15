// ABOUTME: Search-path lookup for external executables.
// ABOUTME: Fails with a remediation message when a required tool is missing.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Find `name` in the directories of `search_path` (a PATH-style list).
/// Names containing a path separator are checked as given.
pub fn find_executable(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let search_path = search_path?;
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidate_names(name).map(move |file| dir.join(file)))
        .find(|candidate| is_executable(candidate))
}

/// Look `name` up on the process PATH.
pub fn require_executable(name: &str) -> Result<PathBuf> {
    let search_path = std::env::var_os("PATH");
    find_executable(name, search_path.as_deref()).ok_or_else(|| {
        tracing::debug!("{name} not found on PATH");
        Error::DependencyMissing {
            executable: name.to_string(),
            search_path: search_path
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    })
}

fn candidate_names(name: &str) -> impl Iterator<Item = String> {
    let mut names = vec![name.to_string()];
    if cfg!(windows) && Path::new(name).extension().is_none() {
        names.push(format!("{name}.exe"));
    }
    names.into_iter()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
