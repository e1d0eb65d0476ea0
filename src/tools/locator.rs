//! Executable location with fallback directories.
//!
//! Absence is an expected outcome here, not a fault: every function returns
//! `Option` and never touches the filesystem beyond read-only probing.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Find the first existing executable for `name`, checking the ambient PATH
/// first, then each configured fallback location in order.
///
/// Fallback entries may be full executable paths or directories to probe.
pub fn find_executable(name: &str, fallbacks: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = which(name) {
        return Some(path);
    }

    for candidate in fallbacks {
        let path = if candidate.is_dir() {
            candidate.join(name)
        } else {
            candidate.clone()
        };
        if is_executable(&path) {
            return Some(path);
        }
    }

    None
}

/// Look up `name` on the ambient PATH, like `which(1)`.
pub fn which(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    find_in_path_value(name, &path_var)
}

/// PATH lookup against an explicit PATH value. Split out so tests can probe
/// without mutating the process environment.
pub fn find_in_path_value(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|p| is_executable(p))
}

/// True if `path` is an existing regular file with an execute bit set.
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_find_in_path_value() {
        let tmp = TempDir::new().unwrap();
        let exe = write_executable(tmp.path(), "faketool");

        let path_var = std::env::join_paths([tmp.path().to_path_buf()]).unwrap();
        assert_eq!(find_in_path_value("faketool", &path_var), Some(exe));
        assert_eq!(find_in_path_value("othertool", &path_var), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("plainfile"), "data").unwrap();

        let path_var = std::env::join_paths([tmp.path().to_path_buf()]).unwrap();
        assert_eq!(find_in_path_value("plainfile", &path_var), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_fallback_directory_and_full_path() {
        let tmp = TempDir::new().unwrap();
        let exe = write_executable(tmp.path(), "fastqc");

        // Directory fallback
        let found = find_executable("fastqc", &[tmp.path().to_path_buf()]);
        assert_eq!(found, Some(exe.clone()));

        // Full-path fallback
        let found = find_executable("fastqc", &[exe.clone()]);
        assert_eq!(found, Some(exe));
    }

    #[test]
    fn test_exhausted_fallbacks_return_none() {
        let found = find_executable(
            "definitely-not-a-real-tool-xyz",
            &[PathBuf::from("/nonexistent/dir")],
        );
        assert_eq!(found, None);
    }
}
