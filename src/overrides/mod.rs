//! Per-binary hook overrides and their resolution.
//!
//! Every provider operation (finding the installer, choosing packages, locating the
//! binary, reading its version, hashing it, installing it) is a *hook*. A hook can be
//! overridden for one binary name or for every binary (`*`) with a [`Handler`]:
//!
//! - [`Handler::Literal`] - a fixed value, e.g. `packages = ["yt-dlp[default]"]`
//! - [`Handler::Computed`] - a closure called with a [`HookContext`]
//! - [`Handler::External`] - a name looked up in the provider's [`HandlerRegistry`]
//!   only when the hook fires
//!
//! # Lookup order
//!
//! For a `(provider, hook, binary)` triple the first match wins:
//!
//! 1. the entry keyed by the exact binary name
//! 2. the wildcard entry `*`
//! 3. the provider's built-in behaviour
//!
//! # Examples
//!
//! ```rust
//! use binresolve::overrides::{Handler, HookOverrides};
//! use binresolve::provider::env;
//!
//! let provider = env::provider(&[])?.with_overrides(
//!     "python",
//!     &HookOverrides::new().packages(Handler::Literal(vec!["python3".to_string()])),
//! );
//! assert_eq!(provider.get_packages("python")?, vec!["python3".to_string()]);
//! assert_eq!(provider.get_packages("curl")?, vec!["curl".to_string()]);
//! # Ok::<(), binresolve::core::BinError>(())
//! ```

mod registry;

pub use registry::HandlerRegistry;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::{BinError, Result};
use crate::provider::BinProvider;
use crate::version::SemVer;

/// Key matching every binary name.
pub const WILDCARD: &str = "*";

/// Function type behind [`Handler::Computed`] and registered external handlers.
pub type HandlerFn<T> = Arc<dyn Fn(&HookContext<'_>) -> anyhow::Result<T> + Send + Sync>;

/// What a handler can see when it fires.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Provider the hook belongs to
    pub provider: &'a BinProvider,
    /// Binary being resolved
    pub bin_name: &'a str,
    /// Resolved path, set for the `version` and `sha256` hooks
    pub abspath: Option<&'a Path>,
    /// Packages to install, set for the `install` hook
    pub packages: &'a [String],
}

impl<'a> HookContext<'a> {
    /// Context with only the provider and binary name.
    #[must_use]
    pub const fn new(provider: &'a BinProvider, bin_name: &'a str) -> Self {
        Self {
            provider,
            bin_name,
            abspath: None,
            packages: &[],
        }
    }

    /// Attach the resolved path of the binary.
    #[must_use]
    pub const fn with_abspath(mut self, abspath: &'a Path) -> Self {
        self.abspath = Some(abspath);
        self
    }

    /// Attach the package list being installed.
    #[must_use]
    pub const fn with_packages(mut self, packages: &'a [String]) -> Self {
        self.packages = packages;
        self
    }
}

/// The overridable provider operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Locate the provider's installer binary
    Installer,
    /// Package names handed to the installer
    Packages,
    /// Primary absolute path of the binary
    Abspath,
    /// Version of the resolved binary
    Version,
    /// Content hash of the resolved binary
    Sha256,
    /// Run the installation
    Install,
}

impl Hook {
    /// All hooks, in resolution order.
    pub const ALL: [Self; 6] =
        [Self::Installer, Self::Packages, Self::Abspath, Self::Version, Self::Sha256, Self::Install];

    /// Name used in configuration files and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installer => "installer",
            Self::Packages => "packages",
            Self::Abspath => "abspath",
            Self::Version => "version",
            Self::Sha256 => "sha256",
            Self::Install => "install",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Hook {
    type Err = BinError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL.into_iter().find(|hook| hook.as_str() == s).ok_or_else(|| {
            BinError::validation(
                "hook",
                s,
                format!(
                    "expected one of {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ),
            )
        })
    }
}

/// An override value for a single hook.
pub enum Handler<T> {
    /// Fixed value
    Literal(T),
    /// Closure evaluated each time the hook fires
    Computed(HandlerFn<T>),
    /// Name of a handler in the provider's [`HandlerRegistry`], resolved lazily
    External(String),
}

impl<T: Clone + 'static> Handler<T> {
    /// Wrap a closure as a [`Handler::Computed`].
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&HookContext<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Reference a handler registered under `name`.
    pub fn external(name: impl Into<String>) -> Self {
        Self::External(name.into())
    }

    /// Produce the handler's value for `hook` in `ctx`.
    ///
    /// The outer result fails only when an [`Handler::External`] name cannot be
    /// resolved, which aborts resolution. The inner result is the handler's own
    /// outcome; callers swallow it into their default behaviour.
    ///
    /// # Errors
    ///
    /// Returns [`BinError::OverrideResolution`] for unknown or wrongly-typed external
    /// references.
    pub fn evaluate(&self, hook: Hook, ctx: &HookContext<'_>) -> Result<anyhow::Result<T>> {
        match self {
            Self::Literal(value) => Ok(Ok(value.clone())),
            Self::Computed(f) => Ok(f(ctx)),
            Self::External(reference) => {
                let f = ctx.provider.registry().resolve::<T>(reference).map_err(|reason| {
                    BinError::OverrideResolution {
                        provider: ctx.provider.name.clone(),
                        hook: hook.to_string(),
                        reference: reference.clone(),
                        reason,
                    }
                })?;
                Ok(f(ctx))
            }
        }
    }
}

impl<T> From<T> for Handler<T> {
    fn from(value: T) -> Self {
        Self::Literal(value)
    }
}

impl<T: Clone> Clone for Handler<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(value.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
            Self::External(name) => Self::External(name.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
            Self::External(name) => f.debug_tuple("External").field(name).finish(),
        }
    }
}

/// A bundle of optional overrides for one binary on one provider.
///
/// Every field left `None` keeps the provider's behaviour for that hook.
#[derive(Debug, Clone, Default)]
pub struct HookOverrides {
    /// Installer path override
    pub installer: Option<Handler<Option<PathBuf>>>,
    /// Package list override
    pub packages: Option<Handler<Vec<String>>>,
    /// Absolute path override
    pub abspath: Option<Handler<Option<PathBuf>>>,
    /// Version override
    pub version: Option<Handler<Option<SemVer>>>,
    /// Hash override
    pub sha256: Option<Handler<Option<String>>>,
    /// Install override, returning the install log
    pub install: Option<Handler<String>>,
}

impl HookOverrides {
    /// Empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the installer lookup.
    #[must_use]
    pub fn installer(mut self, handler: impl Into<Handler<Option<PathBuf>>>) -> Self {
        self.installer = Some(handler.into());
        self
    }

    /// Override the package list.
    #[must_use]
    pub fn packages(mut self, handler: impl Into<Handler<Vec<String>>>) -> Self {
        self.packages = Some(handler.into());
        self
    }

    /// Override the primary absolute path.
    #[must_use]
    pub fn abspath(mut self, handler: impl Into<Handler<Option<PathBuf>>>) -> Self {
        self.abspath = Some(handler.into());
        self
    }

    /// Override the version lookup.
    #[must_use]
    pub fn version(mut self, handler: impl Into<Handler<Option<SemVer>>>) -> Self {
        self.version = Some(handler.into());
        self
    }

    /// Override the hash computation.
    #[must_use]
    pub fn sha256(mut self, handler: impl Into<Handler<Option<String>>>) -> Self {
        self.sha256 = Some(handler.into());
        self
    }

    /// Override the installation.
    #[must_use]
    pub fn install(mut self, handler: impl Into<Handler<String>>) -> Self {
        self.install = Some(handler.into());
        self
    }

    /// Point `hook` at an external handler name.
    #[must_use]
    pub fn external(self, hook: Hook, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        match hook {
            Hook::Installer => self.installer(Handler::External(reference)),
            Hook::Packages => self.packages(Handler::External(reference)),
            Hook::Abspath => self.abspath(Handler::External(reference)),
            Hook::Version => self.version(Handler::External(reference)),
            Hook::Sha256 => self.sha256(Handler::External(reference)),
            Hook::Install => self.install(Handler::External(reference)),
        }
    }

    /// Whether no hook is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.installer.is_none()
            && self.packages.is_none()
            && self.abspath.is_none()
            && self.version.is_none()
            && self.sha256.is_none()
            && self.install.is_none()
    }
}

/// Handlers for one hook, keyed by binary name or [`WILDCARD`].
#[derive(Debug, Clone)]
pub struct HookMap<T>(HashMap<String, Handler<T>>);

impl<T> Default for HookMap<T> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<T: Clone> HookMap<T> {
    /// Exact entry for `bin_name`, else the wildcard entry.
    #[must_use]
    pub fn lookup(&self, bin_name: &str) -> Option<&Handler<T>> {
        self.0.get(bin_name).or_else(|| self.0.get(WILDCARD))
    }

    /// Set the handler for `key`.
    pub fn insert(&mut self, key: impl Into<String>, handler: Handler<T>) {
        self.0.insert(key.into(), handler);
    }

    /// Number of keyed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// All hook overrides configured on a provider.
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    /// `installer` hook entries
    pub installer: HookMap<Option<PathBuf>>,
    /// `packages` hook entries
    pub packages: HookMap<Vec<String>>,
    /// `abspath` hook entries
    pub abspath: HookMap<Option<PathBuf>>,
    /// `version` hook entries
    pub version: HookMap<Option<SemVer>>,
    /// `sha256` hook entries
    pub sha256: HookMap<Option<String>>,
    /// `install` hook entries
    pub install: HookMap<String>,
}

impl HookTable {
    /// Insert every handler of `overrides` under `key`.
    pub fn insert(&mut self, key: &str, overrides: &HookOverrides) {
        if let Some(handler) = &overrides.installer {
            self.installer.insert(key, handler.clone());
        }
        if let Some(handler) = &overrides.packages {
            self.packages.insert(key, handler.clone());
        }
        if let Some(handler) = &overrides.abspath {
            self.abspath.insert(key, handler.clone());
        }
        if let Some(handler) = &overrides.version {
            self.version.insert(key, handler.clone());
        }
        if let Some(handler) = &overrides.sha256 {
            self.sha256.insert(key, handler.clone());
        }
        if let Some(handler) = &overrides.install {
            self.install.insert(key, handler.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packages_for(table: &HookTable, provider: &BinProvider, bin: &str) -> Option<Vec<String>> {
        let ctx = HookContext::new(provider, bin);
        table.packages.lookup(bin).map(|h| h.evaluate(Hook::Packages, &ctx).unwrap().unwrap())
    }

    #[test]
    fn test_exact_entry_beats_wildcard() {
        let provider = BinProvider::new("custom").unwrap();
        let mut table = HookTable::default();
        table.insert("*", &HookOverrides::new().packages(vec!["wildcard".to_string()]));
        table.insert("wget", &HookOverrides::new().packages(vec!["exact".to_string()]));

        assert_eq!(packages_for(&table, &provider, "wget"), Some(vec!["exact".to_string()]));
        assert_eq!(packages_for(&table, &provider, "curl"), Some(vec!["wildcard".to_string()]));
    }

    #[test]
    fn test_no_entry_means_default() {
        let provider = BinProvider::new("custom").unwrap();
        let mut table = HookTable::default();
        table.insert("wget", &HookOverrides::new().version(Some(SemVer::new(1, 0, 0))));
        assert!(packages_for(&table, &provider, "wget").is_none());
        assert!(table.version.lookup("curl").is_none());
    }

    #[test]
    fn test_computed_handler_sees_context() {
        let provider = BinProvider::new("custom").unwrap();
        let handler: Handler<Vec<String>> =
            Handler::computed(|ctx| Ok(vec![format!("{}:{}", ctx.provider.name, ctx.bin_name)]));
        let ctx = HookContext::new(&provider, "jq");
        assert_eq!(handler.evaluate(Hook::Packages, &ctx).unwrap().unwrap(), vec!["custom:jq"]);
    }

    #[test]
    fn test_computed_handler_error_is_inner() {
        let provider = BinProvider::new("custom").unwrap();
        let handler: Handler<Option<SemVer>> = Handler::computed(|_ctx| anyhow::bail!("boom"));
        let ctx = HookContext::new(&provider, "jq");
        let outcome = handler.evaluate(Hook::Version, &ctx).unwrap();
        assert!(outcome.is_err());
    }

    #[test]
    fn test_external_resolved_at_call_time() {
        let registry = Arc::new(HandlerRegistry::new());
        let provider = BinProvider::new("custom").unwrap().with_registry(Arc::clone(&registry));
        let handler: Handler<String> = Handler::external("late.install");
        let ctx = HookContext::new(&provider, "jq");

        let err = handler.evaluate(Hook::Install, &ctx).unwrap_err();
        assert!(matches!(err, BinError::OverrideResolution { ref hook, .. } if hook == "install"));

        registry.register("late.install", |ctx| Ok(format!("installed {}", ctx.bin_name)));
        assert_eq!(handler.evaluate(Hook::Install, &ctx).unwrap().unwrap(), "installed jq");
    }

    #[test]
    fn test_overrides_external_builder() {
        let overrides = HookOverrides::new().external(Hook::Sha256, "hash.fn");
        assert!(matches!(overrides.sha256, Some(Handler::External(ref name)) if name == "hash.fn"));
        assert!(!overrides.is_empty());
        assert!(HookOverrides::new().is_empty());
    }

    #[test]
    fn test_hook_names_round_trip() {
        for hook in Hook::ALL {
            assert_eq!(hook.as_str().parse::<Hook>().unwrap(), hook);
        }
        assert!("uninstall".parse::<Hook>().is_err());
    }
}
