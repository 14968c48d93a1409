//! Common test utilities for binresolve integration tests
//!
//! [`TestEnv`] gives each CLI test an isolated home directory, configuration file
//! and directory of fake executables placed first on `PATH`.

// Not every helper is used by every test module
#![allow(dead_code)]

use assert_cmd::Command;
use binresolve::test_utils::FakeBinDir;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated environment for running the `binresolve` binary.
pub struct TestEnv {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    home: PathBuf,
    pub bins: FakeBinDir,
}

impl TestEnv {
    /// Create an environment with an empty home and no fake binaries.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let home = temp_dir.path().join("home");
        fs::create_dir_all(&home).expect("Failed to create home dir");

        Self {
            _temp_dir: temp_dir,
            home,
            bins: FakeBinDir::new(),
        }
    }

    /// Home directory used by the child process.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Default configuration file location inside the fake home.
    pub fn config_path(&self) -> PathBuf {
        self.home.join(".binresolve").join("config.toml")
    }

    /// Write the default configuration file.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.config_path();
        fs::create_dir_all(path.parent().expect("config path has a parent")).expect("Failed to create config dir");
        fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// `binresolve` with the environment pointed at this sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("binresolve").expect("binresolve binary is built");
        let path = std::env::join_paths([self.bins.path(), Path::new("/usr/bin"), Path::new("/bin")])
            .expect("Failed to join PATH");
        cmd.env("HOME", &self.home)
            .env("PATH", path)
            .env("NO_COLOR", "1")
            .env("BINRESOLVE_NO_PROGRESS", "1")
            .env_remove("BINRESOLVE_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
