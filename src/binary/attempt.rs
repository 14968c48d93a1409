//! The diagnostic trail of a resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::core::BinError;
use crate::version::SemVer;

/// What was asked of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptAction {
    /// Look the binary up without installing
    Load,
    /// Install, then look the binary up
    Install,
}

impl fmt::Display for AttemptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => f.write_str("load"),
            Self::Install => f.write_str("install"),
        }
    }
}

/// How a provider attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Found an executable with an acceptable version
    Resolved {
        /// Path that was adopted
        abspath: PathBuf,
        /// Its version
        version: SemVer,
    },
    /// No executable with that name
    NotFound,
    /// Found a path but it is not executable or printed no parseable version
    Unusable {
        /// Path that was found
        abspath: PathBuf,
    },
    /// Found a version outside the required range
    VersionMismatch {
        /// Version that was found
        version: SemVer,
        /// Requirement it failed
        requirement: String,
    },
    /// The provider's installer is missing on this host
    Unavailable {
        /// Why the provider cannot install
        reason: String,
    },
    /// The install itself failed
    Failed {
        /// Why the install failed
        reason: String,
    },
}

impl AttemptOutcome {
    /// Whether the attempt produced the binary.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Outcome for a provider whose install returned `error`.
    #[must_use]
    pub fn from_install_error(error: &BinError) -> Self {
        match error {
            BinError::ProviderUnavailable {
                reason,
                ..
            } => Self::Unavailable {
                reason: reason.clone(),
            },
            BinError::InstallError {
                code,
                stdout,
                stderr,
                ..
            } => {
                let output = if stderr.trim().is_empty() { stdout } else { stderr };
                let last_line = output.trim().lines().last().unwrap_or_default();
                let reason = match code {
                    Some(code) => format!("installer exited with code {code}"),
                    None => "installer failed".to_string(),
                };
                Self::Failed {
                    reason: if last_line.is_empty() { reason } else { format!("{reason}: {last_line}") },
                }
            }
            other => Self::Failed {
                reason: other.to_string(),
            },
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved {
                abspath,
                version,
            } => write!(f, "resolved {} ({version})", abspath.display()),
            Self::NotFound => f.write_str("not found"),
            Self::Unusable {
                abspath,
            } => write!(f, "{} has no parseable version", abspath.display()),
            Self::VersionMismatch {
                version,
                requirement,
            } => write!(f, "version {version} does not satisfy {requirement}"),
            Self::Unavailable {
                reason,
            } => write!(f, "unavailable: {reason}"),
            Self::Failed {
                reason,
            } => write!(f, "failed: {reason}"),
        }
    }
}

/// One provider tried during a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAttempt {
    /// Provider name
    pub provider: String,
    /// What was asked of it
    pub action: AttemptAction,
    /// How it ended
    pub outcome: AttemptOutcome,
}

impl ProviderAttempt {
    /// Record an attempt.
    pub fn new(provider: impl Into<String>, action: AttemptAction, outcome: AttemptOutcome) -> Self {
        Self {
            provider: provider.into(),
            action,
            outcome,
        }
    }
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.provider, self.action, self.outcome)
    }
}
