//! Integration test suite for binresolve
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: Provider fallback, tie-break, installs and the attempt trail
//! - **overrides**: Hook overrides, external handlers and configuration-driven overrides
//! - **records**: Serialized records and catalog queries
//! - **cli**: The `binresolve` executable end to end
//!
//! Every test that runs fake executables is Unix-only; they are `/bin/sh` scripts.

#[path = "../common/mod.rs"]
mod common;

#[cfg(unix)]
mod cli;
#[cfg(unix)]
mod overrides;
#[cfg(unix)]
mod records;
mod resolution;
