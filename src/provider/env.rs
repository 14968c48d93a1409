//! The `env` provider: binaries already on `PATH`.

use std::path::PathBuf;

use super::BinProvider;
use crate::core::Result;
use crate::utils::platform::{dedupe_paths, system_path};

/// Provider name.
pub const NAME: &str = "env";

/// Read-only provider searching `extra_dirs` and then the process `PATH`.
///
/// When `PATH` is unset a fixed default path is used instead. The provider has no
/// installer, so [`BinProvider::install`] fails with
/// [`BinError::ProviderUnavailable`](crate::core::BinError::ProviderUnavailable)
/// unless an `install` override is configured.
///
/// # Errors
///
/// Never fails for the built-in name; the `Result` mirrors the other constructors.
pub fn provider(extra_dirs: &[PathBuf]) -> Result<BinProvider> {
    let search_path = dedupe_paths(extra_dirs.iter().cloned().chain(system_path()));
    Ok(BinProvider::new(NAME)?.with_search_path(search_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_has_no_installer() {
        let provider = provider(&[]).unwrap();
        assert_eq!(provider.name, "env");
        assert!(provider.installer.is_none());
        assert!(!provider.search_path.is_empty());
    }

    #[test]
    fn test_extra_dirs_searched_first() {
        let extra = PathBuf::from("/opt/binresolve-test/bin");
        let provider = provider(std::slice::from_ref(&extra)).unwrap();
        assert_eq!(provider.search_path.first(), Some(&extra));
    }
}
