//! Declared binaries and their per-provider overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::core::Result;
use crate::overrides::{Hook, HookOverrides};
use crate::utils::resolve_path;
use crate::version::SemVer;

/// A `[binaries.<name>]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryConfig {
    /// Free text shown by `list`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Provider order for this binary; the global order when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<String>>,

    /// Version requirement such as `">=2024.1"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,

    /// Overrides keyed by provider name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, OverrideConfig>,
}

/// A `[binaries.<name>.overrides.<provider>]` table.
///
/// Literal values cover the common cases; `handlers` points hooks at functions a
/// host application registered in the [`HandlerRegistry`](crate::overrides::HandlerRegistry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideConfig {
    /// Package names handed to the installer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<String>>,

    /// Fixed location of the binary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abspath: Option<String>,

    /// Fixed version, skipping the `--version` probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Fixed content hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Fixed location of the provider's installer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer: Option<String>,

    /// Hook name to registered handler name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub handlers: BTreeMap<String, String>,
}

impl OverrideConfig {
    /// Build the [`HookOverrides`] this table describes.
    ///
    /// Handler references win over literal values for the same hook.
    ///
    /// # Errors
    ///
    /// - [`BinError::Validation`](crate::core::BinError::Validation) for unknown hook
    ///   names
    /// - [`BinError::Parse`](crate::core::BinError::Parse) for unparseable versions
    /// - [`BinError::ConfigError`](crate::core::BinError::ConfigError) for paths that
    ///   cannot be expanded
    pub fn to_overrides(&self) -> Result<HookOverrides> {
        let mut overrides = HookOverrides::new();

        if let Some(packages) = &self.packages {
            overrides = overrides.packages(packages.clone());
        }
        if let Some(abspath) = &self.abspath {
            overrides = overrides.abspath(Some(resolve_path(abspath)?));
        }
        if let Some(version) = &self.version {
            overrides = overrides.version(Some(SemVer::parse(version)?));
        }
        if let Some(sha256) = &self.sha256 {
            overrides = overrides.sha256(Some(sha256.clone()));
        }
        if let Some(installer) = &self.installer {
            overrides = overrides.installer(Some(resolve_path(installer)?));
        }
        for (hook, reference) in &self.handlers {
            overrides = overrides.external(Hook::from_str(hook)?, reference.as_str());
        }

        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BinError;
    use crate::overrides::Handler;
    use std::path::PathBuf;

    #[test]
    fn test_to_overrides_literals() {
        let config = OverrideConfig {
            packages: Some(vec!["yt-dlp[default]".into()]),
            abspath: Some("/opt/tools/yt-dlp".into()),
            version: Some("2024.08.06".into()),
            ..Default::default()
        };
        let overrides = config.to_overrides().unwrap();

        assert!(matches!(overrides.packages, Some(Handler::Literal(ref p)) if p == &["yt-dlp[default]"]));
        assert!(
            matches!(overrides.abspath, Some(Handler::Literal(Some(ref p))) if p == &PathBuf::from("/opt/tools/yt-dlp"))
        );
        assert!(matches!(overrides.version, Some(Handler::Literal(Some(v))) if v == SemVer::new(2024, 8, 6)));
        assert!(overrides.install.is_none());
    }

    #[test]
    fn test_to_overrides_handlers() {
        let config = OverrideConfig {
            packages: Some(vec!["ignored".into()]),
            handlers: BTreeMap::from([
                ("install".to_string(), "myapp.install_ytdlp".to_string()),
                ("packages".to_string(), "myapp.packages".to_string()),
            ]),
            ..Default::default()
        };
        let overrides = config.to_overrides().unwrap();
        assert!(matches!(overrides.install, Some(Handler::External(ref r)) if r == "myapp.install_ytdlp"));
        assert!(matches!(overrides.packages, Some(Handler::External(ref r)) if r == "myapp.packages"));
    }

    #[test]
    fn test_to_overrides_rejects_bad_values() {
        let bad_hook = OverrideConfig {
            handlers: BTreeMap::from([("uninstall".to_string(), "x".to_string())]),
            ..Default::default()
        };
        assert!(matches!(bad_hook.to_overrides(), Err(BinError::Validation { .. })));

        let bad_version = OverrideConfig {
            version: Some("latest".into()),
            ..Default::default()
        };
        assert!(matches!(bad_version.to_overrides(), Err(BinError::Parse { .. })));
    }
}
