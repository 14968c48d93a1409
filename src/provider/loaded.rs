//! The result of looking a binary up through one provider.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::SCRIPT_EXTENSIONS;
use crate::utils::platform::is_executable_file;
use crate::version::SemVer;

/// What one provider found for one binary.
///
/// A snapshot may be partial: a path with no parseable version is kept for
/// diagnostics but is not [valid](Self::is_valid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedBinary {
    /// Binary name
    pub name: String,
    /// Provider that produced this snapshot
    pub provider: String,
    /// Primary absolute path
    pub abspath: Option<PathBuf>,
    /// Every match the provider found, primary first
    #[serde(default)]
    pub abspaths: Vec<PathBuf>,
    /// Parsed version
    pub version: Option<SemVer>,
    /// Lowercase hex SHA-256 of the file at `abspath`
    pub sha256: Option<String>,
}

impl LoadedBinary {
    /// Snapshot with nothing found.
    #[must_use]
    pub fn empty(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            abspath: None,
            abspaths: Vec::new(),
            version: None,
            sha256: None,
        }
    }

    /// `abspath` is an executable file and the version parsed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_executable() && self.version.is_some()
    }

    /// Whether `abspath` points at an executable file.
    #[must_use]
    pub fn is_executable(&self) -> bool {
        self.abspath.as_deref().is_some_and(is_executable_file)
    }

    /// Whether `abspath` is an interpreted script (`.py`, `.js`, `.sh`).
    #[must_use]
    pub fn is_script(&self) -> bool {
        self.abspath
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
    }

    /// Directory containing `abspath`.
    #[must_use]
    pub fn bin_dir(&self) -> Option<&Path> {
        self.abspath.as_deref().and_then(Path::parent)
    }

    /// `abspath` with symlinks resolved, `None` when it does not exist.
    #[must_use]
    pub fn respath(&self) -> Option<PathBuf> {
        self.abspath.as_deref().and_then(|path| std::fs::canonicalize(path).ok())
    }
}
