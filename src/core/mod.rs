//! Core types for binresolve
//!
//! This module holds the error type shared by every other module and the
//! user-facing error reporting used by the CLI.
//!
//! - [`BinError`] - Enumerated failure modes of the library
//! - [`ErrorContext`] - Error wrapper with details and a suggestion
//! - [`user_friendly_error`] - Convert any `anyhow::Error` for display
//!
//! # Examples
//!
//! ```rust
//! use binresolve::core::{BinError, Result};
//!
//! fn require_loaded(valid: bool) -> Result<()> {
//!     if valid {
//!         Ok(())
//!     } else {
//!         Err(BinError::NotLoaded {
//!             name: "wget".to_string(),
//!         })
//!     }
//! }
//! # assert!(require_loaded(false).is_err());
//! ```

pub mod error;

pub use error::{BinError, ErrorContext, Result, user_friendly_error};
