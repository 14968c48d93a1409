//! TOML parsing with file path context.

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::core::{BinError, Result};

/// Read `path` and deserialize it as TOML.
///
/// # Errors
///
/// [`BinError::ConfigError`] naming the file, for both read and parse failures.
///
/// ```text
/// Failed to parse config file /home/me/.binresolve/config.toml: TOML parse error at line 2, column 13
/// ```
pub fn parse_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| BinError::ConfigError {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&content).map_err(|e| BinError::ConfigError {
        message: format!("Failed to parse config file {}: {}", path.display(), e.message()),
    })
}
