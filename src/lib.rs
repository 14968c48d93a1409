//! binresolve - locate, validate and install command-line binaries
//!
//! Applications that shell out to external tools (`wget`, `yt-dlp`, `jq`, ...)
//! declare those tools as [`Binary`](binary::Binary) dependencies with an ordered
//! list of providers. Resolution walks the providers in order and adopts the first
//! one that yields an executable with a parseable version, installing through the
//! provider's package manager when asked to.
//!
//! # Architecture Overview
//!
//! - A **provider** ([`provider::BinProvider`]) is a source of binaries: the process
//!   `PATH`, apt, Homebrew, pip or npm. It knows its search path and installer.
//! - A **binary** ([`binary::Binary`]) names an executable and the providers allowed
//!   to supply it, plus per-provider [`overrides`].
//! - **Resolution** returns a new `Binary` carrying the resolved snapshot and the
//!   trail of provider attempts; descriptors are never mutated.
//!
//! # Core Modules
//!
//! - [`binary`] - Binary descriptors and ordered provider fallback
//! - [`provider`] - Providers, built-in package managers and binary lookup
//! - [`overrides`] - Per-binary hook overrides and the external handler registry
//! - [`version`] - Lenient version parsing from `--version` output
//! - [`catalog`] - Presentation queries over declared binaries
//!
//! # Supporting Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - `~/.binresolve/config.toml`
//! - [`core`] - Error types and user-facing error rendering
//! - [`utils`] - Subprocesses, hashing, paths and progress spinners
//!
//! # Example
//!
//! ```rust,no_run
//! use binresolve::binary::Binary;
//! use binresolve::provider::{ProviderOptions, builtin};
//! use std::sync::Arc;
//!
//! # fn example() -> binresolve::core::Result<()> {
//! let options = ProviderOptions::default();
//! let wget = Binary::new(
//!     "wget",
//!     vec![Arc::new(builtin("env", &options)?), Arc::new(builtin("apt", &options)?)],
//! );
//!
//! let wget = wget.load_or_install()?;
//! println!("{} {:?}", wget.abspath().unwrap().display(), wget.version());
//! # Ok(())
//! # }
//! ```

pub mod binary;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod overrides;
pub mod provider;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
