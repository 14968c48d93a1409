//! The `brew` provider: Homebrew on macOS and Linux.

use std::path::PathBuf;

use super::{BinProvider, InstallerSpec, RunAs};
use crate::constants::{BREW_BIN_DIRS, BREW_INSTALL_ARGS};
use crate::core::Result;
use crate::utils::ProcessCommand;
use crate::utils::platform::dedupe_paths;

/// Provider name.
pub const NAME: &str = "brew";

/// `brew update && brew install <packages>`.
///
/// Homebrew refuses to run as root, so when binresolve runs as root the installer
/// runs as the user owning the `brew` binary.
///
/// Searches `<brew --prefix>/bin` and the standard Homebrew locations. On hosts
/// without `brew` the search path is empty.
///
/// # Errors
///
/// Never fails for the built-in name; the `Result` mirrors the other constructors.
pub fn provider() -> Result<BinProvider> {
    let search_path = match which::which(NAME) {
        Ok(brew) => {
            let prefix = ProcessCommand::new(brew)
                .arg("--prefix")
                .execute()
                .ok()
                .filter(|output| output.success())
                .map(|output| PathBuf::from(output.stdout.trim()).join("bin"));
            dedupe_paths(prefix.into_iter().chain(BREW_BIN_DIRS.iter().map(PathBuf::from)))
        }
        Err(_) => Vec::new(),
    };

    Ok(BinProvider::new(NAME)?
        .with_installer(
            InstallerSpec::new(NAME)
                .pre_install(["update"])
                .args(BREW_INSTALL_ARGS)
                .run_as(RunAs::InstallerOwner),
        )
        .with_search_path(search_path))
}
