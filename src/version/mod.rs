//! Loose version parsing for real-world `--version` output.
//!
//! Command-line tools print their version in wildly different shapes:
//!
//! ```text
//! Google Chrome 124.0.6367.208                -> 124.0.6367
//! GNU Wget 1.24.5 built on darwin23.2.0.      -> 1.24.5
//! curl 8.4.0 (x86_64-apple-darwin23.0) ...    -> 8.4.0
//! GNU bash, version 5.2.26(1)-release         -> 5.2.26
//! 2024.04.09                                  -> 2024.4.9
//! ```
//!
//! [`SemVer`] normalizes all of them into a `(major, minor, patch)` triple that can be
//! compared and rendered canonically. It is deliberately lossier than
//! [`semver::Version`]: pre-release tags and build metadata are discarded. When a
//! Cargo-style requirement check is needed, [`SemVer::matches`] converts to
//! [`semver::Version`] and delegates.
//!
//! # Parsing rules
//!
//! 1. Only the first non-empty line is considered.
//! 2. The line is split into whitespace columns, and at most the first five are examined.
//! 3. Each column is split on every non-ASCII-digit character; the numeric chunks remain.
//! 4. The first column with two or more chunks (a dotted version) wins. When no column
//!    has one, the first column with a single chunk wins (`"5"` parses as `5.0.0`).
//! 5. The first three chunks become the triple, missing ones default to 0.
//! 6. A winning column that starts with `-` and a digit is a negative number and
//!    fails to parse.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::core::{BinError, Result};

/// Only the leading columns of a version line are considered.
const MAX_COLUMNS: usize = 5;

/// ASCII digits only; the regex crate's `\d` is Unicode-aware.
static DIGITS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new("[0-9]+").ok());

/// A normalized `(major, minor, patch)` version.
///
/// Ordering is lexicographic on the triple, so `1.9.0 < 1.10.0 < 2.0.0`.
/// Serializes as the string `"major.minor.patch"`.
///
/// # Examples
///
/// ```rust
/// use binresolve::version::SemVer;
///
/// let chrome: SemVer = "Google Chrome 124.0.6367.208".parse()?;
/// assert_eq!(chrome, SemVer::new(124, 0, 6367));
/// assert_eq!(chrome.to_string(), "124.0.6367");
///
/// assert!(SemVer::new(1, 9, 0) < SemVer::new(1, 10, 0));
/// # Ok::<(), binresolve::core::BinError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemVer {
    /// Major version
    pub major: u64,
    /// Minor version (0 when absent)
    pub minor: u64,
    /// Patch version (0 when absent)
    pub patch: u64,
}

impl SemVer {
    /// Build a version from its components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse free-form version text.
    ///
    /// # Errors
    ///
    /// Returns [`BinError::Parse`] when the first non-empty line contains no numeric
    /// group in its leading columns, or when the winning group is negative.
    pub fn parse(text: &str) -> Result<Self> {
        let line = text.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or("");
        let parse_error = || BinError::Parse {
            input: line.to_string(),
        };
        let digits = DIGITS.as_ref().ok_or_else(parse_error)?;

        let columns: Vec<Column> = line
            .split_whitespace()
            .take(MAX_COLUMNS)
            .filter_map(|column| numeric_chunks(digits, column))
            .collect();

        let column = columns
            .iter()
            .find(|column| column.chunks.len() >= 2)
            .or_else(|| columns.iter().find(|column| column.chunks.len() == 1))
            .ok_or_else(parse_error)?;
        if column.negative {
            return Err(parse_error());
        }
        let chunks = &column.chunks;

        Ok(Self::new(
            chunks[0],
            chunks.get(1).copied().unwrap_or(0),
            chunks.get(2).copied().unwrap_or(0),
        ))
    }

    /// Check this version against a Cargo-style requirement such as `">=1.2"` or `"^3"`.
    ///
    /// # Errors
    ///
    /// Returns [`BinError::Semver`] when `requirement` is not a valid requirement.
    pub fn matches(&self, requirement: &str) -> Result<bool> {
        let req = semver::VersionReq::parse(requirement)?;
        Ok(req.matches(&semver::Version::from(*self)))
    }
}

struct Column {
    chunks: Vec<u64>,
    negative: bool,
}

/// The first three numeric chunks of a column, `None` when the column has none or
/// one of them overflows.
fn numeric_chunks(digits: &Regex, column: &str) -> Option<Column> {
    let chunks = digits
        .find_iter(column)
        .take(3)
        .map(|m| m.as_str().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    let negative = column.strip_prefix('-').is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()));
    (!chunks.is_empty()).then_some(Column {
        chunks,
        negative,
    })
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemVer {
    type Err = BinError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<(u64, u64, u64)> for SemVer {
    fn from((major, minor, patch): (u64, u64, u64)) -> Self {
        Self::new(major, minor, patch)
    }
}

impl From<SemVer> for semver::Version {
    fn from(v: SemVer) -> Self {
        Self::new(v.major, v.minor, v.patch)
    }
}

impl Serialize for SemVer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemVer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
