//! Executable lookup across a provider's search path.

use std::path::{Path, PathBuf};

use crate::utils::platform::{dedupe_paths, is_executable_file};

/// Every executable named `bin_name` in `dirs`, in directory order, without
/// duplicates.
#[must_use]
pub fn find_all(bin_name: &str, dirs: &[PathBuf]) -> Vec<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    dedupe_paths(
        dirs.iter()
            .filter(|dir| dir.is_dir())
            .filter_map(|dir| which::which_in(bin_name, Some(dir), &cwd).ok()),
    )
}

/// First executable named `bin_name` in `dirs`.
#[must_use]
pub fn find_first(bin_name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    dirs.iter()
        .filter(|dir| dir.is_dir())
        .find_map(|dir| which::which_in(bin_name, Some(dir), &cwd).ok())
}

/// Resolve an installer given either as a bare name or an absolute path.
///
/// Bare names are looked up in `dirs` first, then on the process `PATH`.
#[must_use]
pub fn find_installer(bin: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let path = Path::new(bin);
    if path.is_absolute() {
        return is_executable_file(path).then(|| path.to_path_buf());
    }
    find_first(bin, dirs).or_else(|| which::which(bin).ok())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_utils::FakeBinDir;

    #[test]
    fn test_find_all_in_directory_order() {
        let first = FakeBinDir::new();
        let second = FakeBinDir::new();
        let a = first.add("tool", "tool 1.0.0");
        let b = second.add("tool", "tool 2.0.0");

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(find_all("tool", &dirs), vec![a.clone(), b]);
        assert_eq!(find_first("tool", &dirs), Some(a));
    }

    #[test]
    fn test_find_all_skips_missing_and_duplicate_dirs() {
        let dir = FakeBinDir::new();
        let tool = dir.add("tool", "tool 1.0.0");
        let dirs = vec![
            PathBuf::from("/nonexistent/binresolve"),
            dir.path().to_path_buf(),
            dir.path().to_path_buf(),
        ];
        assert_eq!(find_all("tool", &dirs), vec![tool]);
        assert!(find_all("other", &dirs).is_empty());
    }

    #[test]
    fn test_find_ignores_non_executable() {
        let dir = FakeBinDir::new();
        std::fs::write(dir.path().join("data"), "not executable").unwrap();
        assert!(find_first("data", &[dir.path().to_path_buf()]).is_none());
    }

    #[test]
    fn test_find_installer_absolute() {
        let dir = FakeBinDir::new();
        let pip = dir.add("pip", "pip 24.0");
        assert_eq!(find_installer(pip.to_str().unwrap(), &[]), Some(pip));
        assert!(find_installer("/nonexistent/binresolve/pip", &[]).is_none());
    }
}
