//! Error handling for binresolve
//!
//! This module provides the error type shared by every layer of the crate and the
//! user-friendly error reporting used by the CLI. The error system follows two rules:
//! 1. **Strongly-typed errors** so callers can react to specific failures
//! 2. **User-friendly messages** with details and suggestions for CLI users
//!
//! # Architecture
//!
//! - [`BinError`] - Enumerated error kinds for every failure the library surfaces
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for display
//!
//! # Propagation Policy
//!
//! Per-provider lookup failures (a binary missing from a search path, a version
//! command that prints garbage, an unreadable file) are never raised; providers turn
//! them into "no result" so the fallback chain can continue. Only structural problems
//! ([`BinError::Validation`], [`BinError::OverrideResolution`]) and the exhaustion of
//! every provider ([`BinError::ResolutionFailed`]) reach the caller as errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use binresolve::core::{BinError, user_friendly_error};
//!
//! let error = BinError::NotLoaded {
//!     name: "wget".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::binary::ProviderAttempt;

/// The main error type for binresolve operations
///
/// Each variant names one failure mode from the resolution engine, the provider
/// layer, or the configuration layer. Variants carry enough context (binary name,
/// provider name, captured output) to explain the failure without re-running it.
///
/// # Error Categories
///
/// ## Parsing and validation
/// - [`Parse`] - No version number could be found in a string
/// - [`Validation`] - Malformed binary name, provider name or configuration value
///
/// ## Providers
/// - [`ProviderUnavailable`] - The provider's own installer is missing
/// - [`InstallError`] - The installer process exited non-zero
/// - [`OverrideResolution`] - An external handler reference could not be resolved
///
/// ## Binaries
/// - [`NotLoaded`] - `exec` was called on a binary that never resolved
/// - [`ResolutionFailed`] - Every provider was tried and none produced a binary
///
/// [`Parse`]: BinError::Parse
/// [`Validation`]: BinError::Validation
/// [`ProviderUnavailable`]: BinError::ProviderUnavailable
/// [`InstallError`]: BinError::InstallError
/// [`OverrideResolution`]: BinError::OverrideResolution
/// [`NotLoaded`]: BinError::NotLoaded
/// [`ResolutionFailed`]: BinError::ResolutionFailed
#[derive(Error, Debug)]
pub enum BinError {
    /// No numeric version group could be found in the input
    #[error("Could not parse a version from '{input}'")]
    Parse {
        /// The text that was scanned (first line only)
        input: String,
    },

    /// A name or configuration value failed validation
    ///
    /// Raised before any provider is consulted, e.g. for binary names that contain
    /// path separators.
    #[error("Invalid {subject} '{value}': {reason}")]
    Validation {
        /// What was being validated ("binary name", "provider name", ...)
        subject: String,
        /// The rejected value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The provider's installer binary is not present on this host
    ///
    /// Checked before any install is attempted, so a provider like `brew` on a host
    /// without Homebrew fails fast and the next provider is tried.
    #[error("Provider '{provider}' is not available on this host: {reason}")]
    ProviderUnavailable {
        /// Name of the provider
        provider: String,
        /// Why the provider cannot install (e.g. "apt-get not found in PATH")
        reason: String,
    },

    /// The installer process exited with a non-zero status
    #[error("Provider '{provider}' failed to install '{name}' (exit code {code:?})")]
    InstallError {
        /// Name of the provider whose installer failed
        provider: String,
        /// Binary that was being installed
        name: String,
        /// Package arguments handed to the installer
        packages: Vec<String>,
        /// Exit code of the installer, `None` when killed by a signal
        code: Option<i32>,
        /// Captured standard output of the installer
        stdout: String,
        /// Captured standard error of the installer
        stderr: String,
    },

    /// A handler reference could not be resolved when its hook fired
    #[error("Cannot resolve {hook} handler '{reference}' for provider '{provider}': {reason}")]
    OverrideResolution {
        /// Provider whose hook table held the reference
        provider: String,
        /// Hook being resolved ("install", "version", ...)
        hook: String,
        /// The external reference name
        reference: String,
        /// Why resolution failed
        reason: String,
    },

    /// `exec` was called before the binary was successfully loaded
    #[error("Binary '{name}' has not been loaded")]
    NotLoaded {
        /// Name of the binary
        name: String,
    },

    /// Every provider was tried and none produced a valid binary
    ///
    /// The attempt trail lists each provider with the reason it failed, so users
    /// never see a bare "not found".
    #[error(
        "None of the providers ({}) could find or install '{name}'",
        attempts.iter().map(|a| a.provider.as_str()).collect::<Vec<_>>().join(", ")
    )]
    ResolutionFailed {
        /// Name of the binary
        name: String,
        /// Every provider attempt, in the order they were made
        attempts: Vec<ProviderAttempt>,
    },

    /// A provider name does not match any built-in provider
    #[error("Unknown provider '{name}'")]
    UnknownProvider {
        /// The name that was requested
        name: String,
        /// Closest built-in provider name, if any is close enough
        suggestion: Option<String>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Semver requirement parsing error
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),
}

impl BinError {
    /// Shorthand for a [`BinError::Validation`] error.
    pub fn validation(
        subject: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            subject: subject.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors that must abort resolution instead of falling
    /// through to the next provider.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::OverrideResolution { .. })
    }
}

/// Result alias used across the library.
pub type Result<T, E = BinError> = std::result::Result<T, E>;

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`BinError`] with optional details and a suggestion that
/// the CLI prints below the error line.
///
/// # Examples
///
/// ```rust,no_run
/// use binresolve::core::{BinError, ErrorContext};
///
/// let context = ErrorContext::new(BinError::NotLoaded { name: "jq".into() })
///     .with_suggestion("Run 'binresolve ensure jq' first")
///     .with_details("exec needs a resolved absolute path");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BinError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`BinError`]
    #[must_use]
    pub const fn new(error: BinError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`BinError`] even below `anyhow` context (the CLI wraps library errors
/// with `.context(...)`) and [`std::io::Error`]; anything else is shown with its
/// full context chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let outer = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    let error = match error.downcast::<BinError>() {
        Ok(bin_error) => {
            let wrapped = bin_error.to_string() != outer;
            let ctx = create_error_context(bin_error);
            // keep the CLI's context message when the error itself has no details
            return if wrapped && ctx.details.is_none() { ctx.with_details(outer) } else { ctx };
        }
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(BinError::ConfigError {
                    message: io_error.to_string(),
                })
                .with_suggestion(
                    "Check file ownership, or re-run with the privileges the installer needs",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(BinError::ConfigError {
                    message: io_error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let ctx = ErrorContext::new(BinError::ConfigError {
        message: outer,
    });
    if chain.is_empty() {
        ctx
    } else {
        ctx.with_details(chain.join("\n"))
    }
}

/// Create appropriate [`ErrorContext`] with suggestions for specific errors
fn create_error_context(error: BinError) -> ErrorContext {
    match error {
        BinError::Parse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check what the binary prints for --version, -version or -v")
            .with_details("Versions are read from the first line of the version command output"),
        BinError::Validation {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Binary names must be bare executable names such as 'wget', without path separators",
        ),
        BinError::ProviderUnavailable {
            ref provider,
            ..
        } => {
            let suggestion = format!(
                "Install the '{provider}' package manager or remove it from the provider list"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        BinError::InstallError {
            ref stdout,
            ref stderr,
            ..
        } => {
            let output = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            ErrorContext::new(error)
                .with_details(output)
                .with_suggestion("Re-run with --verbose to see the exact installer command")
        }
        BinError::OverrideResolution {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Register the handler with HandlerRegistry::register before resolving binaries",
        ),
        BinError::NotLoaded {
            ref name,
        } => {
            let suggestion = format!("Run 'binresolve ensure {name}' to load or install it first");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        BinError::ResolutionFailed {
            ref attempts,
            ..
        } => {
            let details = attempts
                .iter()
                .map(|attempt| format!("  - {attempt}"))
                .collect::<Vec<_>>()
                .join("\n");
            ErrorContext::new(error)
                .with_details(format!("Attempts:\n{details}"))
                .with_suggestion("Add another provider, or install the binary manually")
        }
        BinError::UnknownProvider {
            ref suggestion,
            ..
        } => {
            let hint = suggestion.as_ref().map_or_else(
                || format!("Valid providers are: {}", crate::provider::BUILTIN_PROVIDERS.join(", ")),
                |closest| format!("Did you mean '{closest}'?"),
            );
            ErrorContext::new(error).with_suggestion(hint)
        }
        BinError::Toml(_) | BinError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the configuration file syntax (TOML) and provider names"),
        other => ErrorContext::new(other),
    }
}
