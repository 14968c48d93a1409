//! Test utilities for binresolve
//!
//! Helpers shared by unit tests and the integration suite (enable the
//! `test-utils` feature to use them outside this crate):
//! - [`FakeBinDir`] - a temp directory of shell-script executables
//! - [`counting_provider`] - a provider whose installs are observable
//! - [`dir_provider`] - a read-only provider over one directory
//! - [`init_test_logging`] - once-only tracing setup for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use binresolve::binary::Binary;
//! use binresolve::test_utils::{FakeBinDir, dir_provider};
//! use std::sync::Arc;
//!
//! let dir = FakeBinDir::new();
//! dir.add("jq", "jq-1.7.1");
//! let jq = Binary::new("jq", vec![Arc::new(dir_provider("fake", &dir))]).load().unwrap();
//! assert!(jq.is_valid());
//! ```

mod fixtures;

pub use fixtures::{FakeBinDir, counting_provider, dir_provider};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Respects `RUST_LOG` when `level` is `None`; does nothing when neither is
/// given.
///
/// ```bash
/// RUST_LOG=provider=debug,process=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
