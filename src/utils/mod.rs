//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`hash`] - SHA-256 hashing of resolved binaries
//! - [`name`] - Validation of binary and provider names
//! - [`platform`] - Path resolution, `PATH` handling and executable detection
//! - [`process`] - Blocking subprocess builder with captured output
//! - [`progress`] - Spinners for long-running installs

pub mod hash;
pub mod name;
pub mod platform;
pub mod process;
pub mod progress;

pub use hash::sha256_file;
pub use name::{validate_bin_name, validate_provider_name};
pub use platform::{get_home_dir, is_executable_file, is_windows, resolve_path, system_path};
pub use process::{CommandOutput, ProcessCommand, RawOutput};
