//! The `apt` provider: Debian/Ubuntu system packages.

use std::path::{Path, PathBuf};

use super::{BinProvider, InstallerSpec};
use crate::constants::{APT_INSTALL_ARGS, APT_PRE_INSTALL_ARGS};
use crate::core::Result;
use crate::utils::ProcessCommand;
use crate::utils::platform::dedupe_paths;

/// Provider name.
pub const NAME: &str = "apt";

/// Installer binary.
pub const INSTALLER: &str = "apt-get";

/// `apt-get update -qq && apt-get install -y <packages>`.
///
/// The search path holds the `bin` directories dpkg installed `bash` into, so
/// binaries are only attributed to apt on hosts where both `apt-get` and `dpkg`
/// exist. Elsewhere the search path is empty and every lookup comes back empty.
///
/// # Errors
///
/// Never fails for the built-in name; the `Result` mirrors the other constructors.
pub fn provider() -> Result<BinProvider> {
    let search_path = if which::which(INSTALLER).is_ok() { dpkg_bin_dirs() } else { Vec::new() };
    Ok(BinProvider::new(NAME)?
        .with_installer(
            InstallerSpec::new(INSTALLER).pre_install(APT_PRE_INSTALL_ARGS).args(APT_INSTALL_ARGS),
        )
        .with_search_path(search_path))
}

fn dpkg_bin_dirs() -> Vec<PathBuf> {
    let Ok(dpkg) = which::which("dpkg") else {
        return Vec::new();
    };
    match ProcessCommand::new(dpkg).args(["-L", "bash"]).execute() {
        Ok(output) if output.success() => parse_bin_dirs(&output.stdout),
        Ok(output) => {
            tracing::debug!(target: "provider", "[apt] dpkg -L bash exited with {:?}", output.code);
            Vec::new()
        }
        Err(e) => {
            tracing::debug!(target: "provider", "[apt] Cannot run dpkg: {}", e);
            Vec::new()
        }
    }
}

/// The `…/bin` entries of a `dpkg -L` listing.
fn parse_bin_dirs(listing: &str) -> Vec<PathBuf> {
    dedupe_paths(
        listing
            .lines()
            .map(str::trim)
            .filter(|line| Path::new(line).file_name().is_some_and(|name| name == "bin"))
            .map(PathBuf::from),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bin_dirs() {
        let listing = "/.\n/bin\n/bin/bash\n/etc\n/usr\n/usr/bin\n/usr/bin/bashbug\n/usr/share/doc/bash\n/bin\n";
        assert_eq!(parse_bin_dirs(listing), vec![PathBuf::from("/bin"), PathBuf::from("/usr/bin")]);
    }

    #[test]
    fn test_apt_installer_spec() {
        let provider = provider().unwrap();
        let installer = provider.installer.unwrap();
        assert_eq!(installer.bin, "apt-get");
        assert_eq!(installer.pre_install, Some(vec!["update".to_string(), "-qq".to_string()]));
        assert_eq!(installer.args, vec!["install", "-y"]);
    }
}
