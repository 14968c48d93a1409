//! Fake executables and providers for tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use crate::overrides::{Handler, HookOverrides, WILDCARD};
use crate::provider::BinProvider;

/// A temporary directory of fake executables.
///
/// Every executable is a `/bin/sh` script, so binaries created here only run on
/// Unix hosts.
///
/// # Example
///
/// ```rust,no_run
/// use binresolve::test_utils::FakeBinDir;
///
/// let dir = FakeBinDir::new();
/// let wget = dir.add("wget", "GNU Wget 1.24.5 built on linux-gnu.");
/// assert!(wget.exists());
/// ```
pub struct FakeBinDir {
    temp: TempDir,
}

impl FakeBinDir {
    /// Create an empty directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp dir for fake binaries"),
        }
    }

    /// Directory holding the fake executables.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Add `name`, printing `version_line` for `--version` and echoing its
    /// arguments otherwise.
    pub fn add(&self, name: &str, version_line: &str) -> PathBuf {
        self.add_with_flag(name, "--version", version_line)
    }

    /// Add `name`, printing `version_line` only when called with `flag`.
    pub fn add_with_flag(&self, name: &str, flag: &str, version_line: &str) -> PathBuf {
        self.add_script(
            name,
            &format!(
                "if [ \"$1\" = \"{flag}\" ]; then\n  echo '{version_line}'\n  exit 0\nfi\necho \"$@\"\n"
            ),
        )
    }

    /// Add `name` running `body` under `/bin/sh`.
    ///
    /// # Panics
    ///
    /// Panics if the script cannot be written or made executable.
    pub fn add_script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("Failed to write fake binary");
        make_executable(&path);
        path
    }
}

impl Default for FakeBinDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake binary executable");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// A provider searching only `dir`, whose `install` creates a fake binary there
/// and counts invocations.
///
/// Installing `name` writes an executable printing `"<name> <version>"`.
pub fn counting_provider(name: &str, dir: &FakeBinDir, version: &str) -> (BinProvider, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let bin_dir = dir.path().to_path_buf();
    let version = version.to_string();

    let install: Handler<String> = Handler::computed(move |ctx| {
        counter.fetch_add(1, Ordering::SeqCst);
        let path = bin_dir.join(ctx.bin_name);
        std::fs::write(
            &path,
            format!(
                "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo '{} {}'; exit 0; fi\necho \"$@\"\n",
                ctx.bin_name, version
            ),
        )?;
        make_executable(&path);
        Ok(format!("installed {}", ctx.bin_name))
    });

    let provider = BinProvider::new(name)
        .expect("Invalid test provider name")
        .with_search_path(vec![dir.path().to_path_buf()])
        .with_overrides(WILDCARD, &HookOverrides::new().install(install));
    (provider, count)
}

/// A provider searching only `dir`, without an installer.
///
/// # Panics
///
/// Panics if `name` is not a valid provider name.
#[must_use]
pub fn dir_provider(name: &str, dir: &FakeBinDir) -> BinProvider {
    BinProvider::new(name)
        .expect("Invalid test provider name")
        .with_search_path(vec![dir.path().to_path_buf()])
}
