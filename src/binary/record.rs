//! Serializable read-only view of a [`Binary`](super::Binary).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ProviderAttempt;
use crate::provider::LoadedBinary;
use crate::version::SemVer;

/// Persisted form of a binary and its resolved snapshot.
///
/// Overrides are not part of the record since they may hold closures. `is_valid` is
/// stored rather than recomputed, so a record read back on another host still
/// reports what was true when it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryRecord {
    /// Binary name
    pub name: String,
    /// Description
    pub description: String,
    /// Provider names, in priority order
    pub providers: Vec<String>,
    /// Version requirement, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    /// Provider that resolved the binary
    pub provider: Option<String>,
    /// Primary absolute path
    pub abspath: Option<PathBuf>,
    /// Every match of the winning provider, primary first
    #[serde(default)]
    pub abspaths: Vec<PathBuf>,
    /// Resolved version
    pub version: Option<SemVer>,
    /// SHA-256 of the resolved file
    pub sha256: Option<String>,
    /// Whether the binary was valid when recorded
    pub is_valid: bool,
    /// Providers tried during the last resolution
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<ProviderAttempt>,
}

impl BinaryRecord {
    /// The resolved snapshot held by this record, if any.
    #[must_use]
    pub fn loaded(&self) -> Option<LoadedBinary> {
        let provider = self.provider.clone()?;
        Some(LoadedBinary {
            name: self.name.clone(),
            provider,
            abspath: self.abspath.clone(),
            abspaths: self.abspaths.clone(),
            version: self.version,
            sha256: self.sha256.clone(),
        })
    }
}
