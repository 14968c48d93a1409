//! The user configuration file (`~/.binresolve/config.toml`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::binaries::BinaryConfig;
use super::parser::parse_config;
use crate::binary::Binary;
use crate::constants::{CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_PROVIDERS};
use crate::core::{BinError, Result};
use crate::provider::{BinProvider, NpmOptions, PipOptions, ProviderOptions, builtin};
use crate::utils::{get_home_dir, resolve_path};

fn default_providers() -> Vec<String> {
    DEFAULT_PROVIDERS.iter().map(ToString::to_string).collect()
}

/// `[env]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Directories searched before `PATH`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

/// `[pip]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipConfig {
    /// Virtualenv to install into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venv: Option<String>,

    /// Replaces the default flags placed after `pip install`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_args: Option<Vec<String>>,
}

/// `[npm]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmConfig {
    /// Install prefix; global installs when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Parsed configuration file.
///
/// Every table is optional; an empty file is equivalent to
/// `providers = ["env"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default provider order
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,

    /// `env` provider options
    #[serde(default)]
    pub env: EnvConfig,

    /// `pip` provider options
    #[serde(default)]
    pub pip: PipConfig,

    /// `npm` provider options
    #[serde(default)]
    pub npm: NpmConfig,

    /// Declared binaries by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub binaries: BTreeMap<String, BinaryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            env: EnvConfig::default(),
            pip: PipConfig::default(),
            npm: NpmConfig::default(),
            binaries: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// `path` wins when given and must exist. Otherwise `BINRESOLVE_CONFIG`, then
    /// `~/.binresolve/config.toml`; a missing file there yields the defaults.
    ///
    /// # Errors
    ///
    /// As for [`load_from`](Self::load_from).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let path = match std::env::var(CONFIG_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => resolve_path(&value)?,
            _ => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(target: "config", "No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load the configuration at `path`.
    ///
    /// # Errors
    ///
    /// - [`BinError::ConfigError`] when the file cannot be read or parsed
    /// - [`BinError::UnknownProvider`] when it names a provider that is not built in
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(target: "config", "Loading config from {}", path.display());
        let config: Self = parse_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.binresolve/config.toml`
    ///
    /// # Errors
    ///
    /// [`BinError::ConfigError`] when the home directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_home_dir()?.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Built-in provider options with every path expanded.
    ///
    /// # Errors
    ///
    /// [`BinError::ConfigError`] for paths that cannot be expanded.
    pub fn provider_options(&self) -> Result<ProviderOptions> {
        Ok(ProviderOptions {
            env_path: self.env.path.iter().map(|p| resolve_path(p)).collect::<Result<_>>()?,
            pip: PipOptions {
                venv: self.pip.venv.as_deref().map(resolve_path).transpose()?,
                install_args: self.pip.install_args.clone(),
            },
            npm: NpmOptions {
                prefix: self.npm.prefix.as_deref().map(resolve_path).transpose()?,
            },
        })
    }

    /// Construct the named built-in providers, in order.
    ///
    /// # Errors
    ///
    /// [`BinError::UnknownProvider`] for names that are not built in.
    pub fn build_providers(&self, names: &[String]) -> Result<Vec<Arc<BinProvider>>> {
        let options = self.provider_options()?;
        names.iter().map(|name| builtin(name, &options).map(Arc::new)).collect()
    }

    /// Descriptor for `name`.
    ///
    /// Declared binaries carry their description, providers, `min_version` and
    /// overrides; anything else uses the global provider order. A non-empty
    /// `providers` replaces the order in either case.
    ///
    /// # Errors
    ///
    /// Errors from [`build_providers`](Self::build_providers) and
    /// [`OverrideConfig::to_overrides`](super::OverrideConfig::to_overrides).
    pub fn binary(&self, name: &str, providers: &[String]) -> Result<Binary> {
        let declared = self.binaries.get(name);
        let names = if !providers.is_empty() {
            providers
        } else {
            declared.and_then(|b| b.providers.as_deref()).unwrap_or(&self.providers)
        };

        let mut binary = Binary::new(name, self.build_providers(names)?);
        if let Some(declared) = declared {
            binary = binary.with_description(declared.description.as_str());
            if let Some(requirement) = &declared.min_version {
                binary = binary.with_min_version(requirement.as_str());
            }
            for (provider, overrides) in &declared.overrides {
                binary = binary.with_override(provider.as_str(), overrides.to_overrides()?);
            }
        }
        Ok(binary)
    }

    /// Descriptors for every declared binary, by name.
    ///
    /// # Errors
    ///
    /// As for [`binary`](Self::binary).
    pub fn binaries(&self) -> Result<Vec<Binary>> {
        self.binaries.keys().map(|name| self.binary(name, &[])).collect()
    }

    /// Check every provider name the file mentions without constructing anything.
    ///
    /// # Errors
    ///
    /// [`BinError::UnknownProvider`] for the first unknown name.
    pub fn validate(&self) -> Result<()> {
        let declared = self.binaries.values().flat_map(|b| {
            b.providers.iter().flatten().chain(b.overrides.keys())
        });
        for name in self.providers.iter().chain(declared) {
            if !crate::provider::BUILTIN_PROVIDERS.contains(&name.as_str()) {
                return Err(BinError::UnknownProvider {
                    name: name.clone(),
                    suggestion: crate::provider::closest_builtin(name),
                });
            }
        }
        Ok(())
    }
}
