//! Host facts: privilege level and executable search path.

use std::path::{Path, PathBuf};

/// Effective user id of this process.
#[cfg(unix)]
pub fn effective_uid() -> u32 {
    // SAFETY: geteuid() is a simple syscall that returns the effective user ID
    unsafe { libc::geteuid() }
}

/// Effective user id of this process.
#[cfg(not(unix))]
pub fn effective_uid() -> u32 {
    u32::MAX
}

/// Effective group id of this process.
#[cfg(unix)]
pub fn effective_gid() -> u32 {
    // SAFETY: getegid() is a simple syscall that returns the effective group ID
    unsafe { libc::getegid() }
}

/// Effective group id of this process.
#[cfg(not(unix))]
pub fn effective_gid() -> u32 {
    u32::MAX
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On non-unix hosts executability is not tracked in permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Symlinks are
/// followed, so a dangling link does not count as resolvable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_takes_first_match() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_executable(&first.path().join("tool"));
        make_executable(&second.path().join("tool"));

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        assert_eq!(
            resolve_tool_path("tool", &entries),
            Some(first.path().join("tool"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_skips_non_executable() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tool"), "data").unwrap();

        assert!(resolve_tool_path("tool", &[temp.path().to_path_buf()]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_not_resolvable() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("tool"))
            .unwrap();

        assert!(resolve_tool_path("tool", &[temp.path().to_path_buf()]).is_none());
    }

    #[test]
    fn resolve_tool_path_with_empty_path() {
        assert!(resolve_tool_path("sh", &[]).is_none());
    }
}
