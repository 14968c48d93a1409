//! Platform-specific helpers and path resolution
//!
//! Search paths, `PATH` handling and executable detection differ between Unix and
//! Windows. The functions here hide those differences from the providers.

use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_PATH;
use crate::core::{BinError, Result};

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the home directory of the current user.
///
/// # Errors
///
/// Returns [`BinError::ConfigError`] when neither `HOME` (Unix) nor `USERPROFILE`
/// (Windows) can be resolved.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        BinError::ConfigError {
            message: format!("Could not determine home directory. {platform_help}"),
        }
    })
}

/// Resolves a path with tilde expansion and environment variable substitution.
///
/// # Supported Patterns
///
/// - `~/path` - Expands to `{home}/path`
/// - `$VAR/path` and `${VAR}/path` - Expands environment variables
///
/// # Errors
///
/// Returns [`BinError::ConfigError`] when a referenced variable is undefined or the
/// home directory cannot be determined.
///
/// # Examples
///
/// ```rust,no_run
/// use binresolve::utils::platform::resolve_path;
///
/// # fn example() -> binresolve::core::Result<()> {
/// let venv = resolve_path("~/.local/share/binresolve/venv")?;
/// let prefix = resolve_path("$HOME/.npm-global")?;
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        get_home_dir()?;
    }

    let home = || dirs::home_dir().map(|p| p.to_string_lossy().into_owned());
    let expanded =
        shellexpand::full_with_context(path, home, |var| std::env::var(var).map(Some))
            .map_err(|e| BinError::ConfigError {
                message: format!("Failed to expand path '{path}': {e}"),
            })?;

    Ok(PathBuf::from(expanded.as_ref()))
}

/// The directories of the process `PATH`, or [`DEFAULT_PATH`] when it is unset.
#[must_use]
pub fn system_path() -> Vec<PathBuf> {
    match std::env::var_os("PATH") {
        Some(path) if !path.is_empty() => std::env::split_paths(&path).collect(),
        _ => std::env::split_paths(DEFAULT_PATH).collect(),
    }
}

/// Whether `path` is a regular file the current user may execute.
#[must_use]
pub fn is_executable_file(path: &Path) -> bool {
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

/// Effective user id of this process; `None` off Unix.
#[must_use]
pub fn current_uid() -> Option<u32> {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail
        Some(unsafe { libc::geteuid() })
    }

    #[cfg(not(unix))]
    {
        None
    }
}

/// User id owning `path`; `None` off Unix or when the path cannot be read.
#[must_use]
pub fn owner_uid(path: &Path) -> Option<u32> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        std::fs::metadata(path).ok().map(|metadata| metadata.uid())
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        None
    }
}

/// Removes duplicate paths, keeping the first occurrence.
pub fn dedupe_paths(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut seen = std::collections::HashSet::new();
    paths.into_iter().filter(|path| seen.insert(path.clone())).collect()
}
