//! Validation of binary and provider names.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::{BinError, Result};

/// Binary names longer than this are rejected.
pub const MAX_BIN_NAME_LEN: usize = 63;

static BIN_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+@-]*$").ok());

static PROVIDER_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{1,14}$").ok());

/// Check that `name` is a bare executable name such as `wget`, `python3.12` or
/// `g++`.
///
/// # Errors
///
/// Returns [`BinError::Validation`] when the name is empty, contains a path
/// separator, is longer than [`MAX_BIN_NAME_LEN`], or uses characters outside
/// `[A-Za-z0-9._+@-]` (the first one must be alphanumeric).
pub fn validate_bin_name(name: &str) -> Result<()> {
    let reject = |reason: &str| Err(BinError::validation("binary name", name, reason));

    if name.is_empty() {
        return reject("name is empty");
    }
    if name.contains(['/', '\\']) {
        return reject("name must not contain path separators");
    }
    if name.len() > MAX_BIN_NAME_LEN {
        return reject("name is longer than 63 characters");
    }
    if !BIN_NAME.as_ref().is_some_and(|re| re.is_match(name)) {
        return reject("name must start with a letter or digit and contain only [A-Za-z0-9._+@-]");
    }
    Ok(())
}

/// Check that `name` is a valid provider name: 2 to 15 characters, ASCII letters,
/// digits or `_`, starting with a letter.
///
/// # Errors
///
/// Returns [`BinError::Validation`] otherwise.
pub fn validate_provider_name(name: &str) -> Result<()> {
    if PROVIDER_NAME.as_ref().is_some_and(|re| re.is_match(name)) {
        Ok(())
    } else {
        Err(BinError::validation(
            "provider name",
            name,
            "must be 2-15 characters of [A-Za-z0-9_] starting with a letter",
        ))
    }
}
