//! Binary descriptors and ordered provider fallback
//!
//! A [`Binary`] declares a dependency on an executable: its name, the providers
//! allowed to supply it in priority order, per-provider [`HookOverrides`] and an
//! optional version requirement. Declaring one performs no I/O.
//!
//! # Resolution
//!
//! [`load`](Binary::load), [`install`](Binary::install) and
//! [`load_or_install`](Binary::load_or_install) walk the providers in declared order
//! and adopt the first result that has an executable path and a parseable version
//! (and satisfies `min_version` when set). Declaration order is the only tie-break.
//! Each call returns a new `Binary`; the descriptor it was called on never changes.
//!
//! ```text
//! Binary::new ──load()──┬─> VALID    (resolved snapshot + attempt trail)
//!                       └─> INVALID  (no resolved fields, attempt trail only)
//!
//! INVALID ──install()──┬─> VALID
//!                      └─> Err(ResolutionFailed { attempts })
//! ```
//!
//! Concurrent resolution of the same binary may install twice; callers that need
//! concurrency must serialize per binary name.
//!
//! # Examples
//!
//! ```rust,no_run
//! use binresolve::binary::Binary;
//! use binresolve::overrides::HookOverrides;
//! use binresolve::provider::{ProviderOptions, builtin};
//! use std::sync::Arc;
//!
//! # fn example() -> binresolve::core::Result<()> {
//! let options = ProviderOptions::default();
//! let ytdlp = Binary::new(
//!     "yt-dlp",
//!     vec![Arc::new(builtin("env", &options)?), Arc::new(builtin("pip", &options)?)],
//! )
//! .with_override("pip", HookOverrides::new().packages(vec!["yt-dlp[default]".to_string()]))
//! .with_min_version(">=2024.1");
//!
//! let ytdlp = ytdlp.load_or_install()?;
//! let output = ytdlp.exec(["--version"])?;
//! println!("{}", String::from_utf8_lossy(&output.stdout));
//! # Ok(())
//! # }
//! ```

mod attempt;
mod record;

pub use attempt::{AttemptAction, AttemptOutcome, ProviderAttempt};
pub use record::BinaryRecord;

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{BinError, Result};
use crate::overrides::HookOverrides;
use crate::provider::{BinProvider, LoadedBinary};
use crate::utils::{ProcessCommand, RawOutput, validate_bin_name};
use crate::version::SemVer;

/// A declared executable dependency and, after resolution, where it was found.
#[derive(Debug, Clone)]
pub struct Binary {
    /// Executable name, e.g. `wget`
    pub name: String,
    /// Free text; [`description`](Self::description) falls back to the name
    pub description: String,
    /// Providers allowed to supply the binary, first-to-succeed wins
    pub providers: Vec<Arc<BinProvider>>,
    /// Overrides applied to the provider with the matching name
    pub overrides: HashMap<String, HookOverrides>,
    /// Cargo-style version requirement such as `">=2024.1"`
    pub min_version: Option<String>,
    loaded: Option<LoadedBinary>,
    attempts: Vec<ProviderAttempt>,
}

impl Binary {
    /// Declare a binary. Performs no I/O and no validation.
    pub fn new(name: impl Into<String>, providers: Vec<Arc<BinProvider>>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            providers,
            overrides: HashMap::new(),
            min_version: None,
            loaded: None,
            attempts: Vec::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Apply `overrides` whenever provider `provider_name` is consulted.
    #[must_use]
    pub fn with_override(mut self, provider_name: impl Into<String>, overrides: HookOverrides) -> Self {
        self.overrides.insert(provider_name.into(), overrides);
        self
    }

    /// Require the resolved version to satisfy `requirement`.
    #[must_use]
    pub fn with_min_version(mut self, requirement: impl Into<String>) -> Self {
        self.min_version = Some(requirement.into());
        self
    }

    /// Description, or the name when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        if self.description.trim().is_empty() { &self.name } else { &self.description }
    }

    /// Resolved snapshot, `None` unless the last resolution succeeded.
    #[must_use]
    pub const fn loaded(&self) -> Option<&LoadedBinary> {
        self.loaded.as_ref()
    }

    /// Name of the provider that resolved the binary.
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        self.loaded.as_ref().map(|loaded| loaded.provider.as_str())
    }

    /// Primary absolute path.
    #[must_use]
    pub fn abspath(&self) -> Option<&Path> {
        self.loaded.as_ref().and_then(|loaded| loaded.abspath.as_deref())
    }

    /// Every match of the winning provider, primary first.
    #[must_use]
    pub fn abspaths(&self) -> &[PathBuf] {
        self.loaded.as_ref().map_or(&[][..], |loaded| loaded.abspaths.as_slice())
    }

    /// Resolved version.
    #[must_use]
    pub fn version(&self) -> Option<SemVer> {
        self.loaded.as_ref().and_then(|loaded| loaded.version)
    }

    /// SHA-256 of the resolved file.
    #[must_use]
    pub fn sha256(&self) -> Option<&str> {
        self.loaded.as_ref().and_then(|loaded| loaded.sha256.as_deref())
    }

    /// The path is an executable file and its version parsed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.loaded.as_ref().is_some_and(LoadedBinary::is_valid)
    }

    /// Providers tried during the last resolution, in order.
    #[must_use]
    pub fn attempts(&self) -> &[ProviderAttempt] {
        &self.attempts
    }

    fn validate(&self) -> Result<()> {
        validate_bin_name(&self.name)?;
        if let Some(requirement) = &self.min_version {
            semver::VersionReq::parse(requirement).map_err(|e| {
                BinError::validation("minimum version", requirement.as_str(), e.to_string())
            })?;
        }
        Ok(())
    }

    /// `provider` with this binary's overrides for it applied.
    fn configured<'a>(&self, provider: &'a BinProvider) -> Cow<'a, BinProvider> {
        match self.overrides.get(&provider.name) {
            Some(overrides) => Cow::Owned(provider.with_overrides(&self.name, overrides)),
            None => Cow::Borrowed(provider),
        }
    }

    fn judge(&self, loaded: &LoadedBinary) -> Result<AttemptOutcome> {
        let Some(abspath) = loaded.abspath.clone() else {
            return Ok(AttemptOutcome::NotFound);
        };
        let (true, Some(version)) = (loaded.is_executable(), loaded.version) else {
            return Ok(AttemptOutcome::Unusable {
                abspath,
            });
        };
        if let Some(requirement) = &self.min_version
            && !version.matches(requirement)?
        {
            return Ok(AttemptOutcome::VersionMismatch {
                version,
                requirement: requirement.clone(),
            });
        }
        Ok(AttemptOutcome::Resolved {
            abspath,
            version,
        })
    }

    fn resolved(&self, loaded: LoadedBinary, attempts: Vec<ProviderAttempt>) -> Self {
        info!(
            target: "binary",
            "Resolved {} {} via {} at {}",
            self.name,
            loaded.version.map(|v| v.to_string()).unwrap_or_default(),
            loaded.provider,
            loaded.abspath.as_deref().map(|p| p.display().to_string()).unwrap_or_default()
        );
        Self {
            loaded: Some(loaded),
            attempts,
            ..self.clone()
        }
    }

    fn unresolved(&self, attempts: Vec<ProviderAttempt>) -> Self {
        Self {
            loaded: None,
            attempts,
            ..self.clone()
        }
    }

    /// Look the binary up through each provider in order, never installing.
    ///
    /// When no provider succeeds the returned binary is invalid, carries no resolved
    /// fields, and keeps the attempt trail.
    ///
    /// # Errors
    ///
    /// - [`BinError::Validation`] for names that are not bare executable names or an
    ///   unparseable `min_version`
    /// - [`BinError::OverrideResolution`] for unresolvable handler names
    pub fn load(&self) -> Result<Self> {
        self.validate()?;
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let provider = self.configured(provider);
            let loaded = provider.load(&self.name)?;
            let outcome = self.judge(&loaded)?;
            debug!(target: "binary", "{} via {}: {}", self.name, provider.name, outcome);

            let resolved = outcome.is_resolved();
            attempts.push(ProviderAttempt::new(provider.name.as_str(), AttemptAction::Load, outcome));
            if resolved {
                return Ok(self.resolved(loaded, attempts));
            }
        }

        debug!(target: "binary", "{} not found by any of {} providers", self.name, attempts.len());
        Ok(self.unresolved(attempts))
    }

    /// Install through each provider in order until one yields a valid binary.
    ///
    /// A failed install, or an install that succeeds but leaves nothing loadable, is
    /// recorded and the next provider is tried.
    ///
    /// # Errors
    ///
    /// - [`BinError::ResolutionFailed`] listing every attempt when all providers fail
    /// - [`BinError::Validation`] and [`BinError::OverrideResolution`] as for
    ///   [`load`](Self::load)
    pub fn install(&self) -> Result<Self> {
        self.validate()?;
        self.install_after(Vec::with_capacity(self.providers.len()))
    }

    fn install_after(&self, mut attempts: Vec<ProviderAttempt>) -> Result<Self> {
        for provider in &self.providers {
            let provider = self.configured(provider);

            if let Err(error) = provider.install(&self.name) {
                if error.is_structural() {
                    return Err(error);
                }
                warn!(target: "binary", "Installing {} via {} failed: {}", self.name, provider.name, error);
                attempts.push(ProviderAttempt::new(
                    provider.name.as_str(),
                    AttemptAction::Install,
                    AttemptOutcome::from_install_error(&error),
                ));
                continue;
            }

            let loaded = provider.load(&self.name)?;
            let outcome = self.judge(&loaded)?;
            debug!(target: "binary", "{} via {} after install: {}", self.name, provider.name, outcome);

            let resolved = outcome.is_resolved();
            attempts.push(ProviderAttempt::new(provider.name.as_str(), AttemptAction::Install, outcome));
            if resolved {
                return Ok(self.resolved(loaded, attempts));
            }
        }

        Err(BinError::ResolutionFailed {
            name: self.name.clone(),
            attempts,
        })
    }

    /// [`load`](Self::load), and [`install`](Self::install) only when that finds
    /// nothing usable. A valid binary is returned without any install side effect.
    ///
    /// # Errors
    ///
    /// As for [`install`](Self::install); the attempt trail includes the load
    /// attempts.
    pub fn load_or_install(&self) -> Result<Self> {
        let loaded = self.load()?;
        if loaded.is_valid() {
            return Ok(loaded);
        }
        self.install_after(loaded.attempts)
    }

    /// Copy of this descriptor restricted to the provider named `provider_name`.
    ///
    /// Resolving the copy consults only that provider; this descriptor keeps its
    /// full list.
    ///
    /// # Errors
    ///
    /// [`BinError::UnknownProvider`] when no declared provider has that name.
    pub fn only(&self, provider_name: &str) -> Result<Self> {
        let providers: Vec<Arc<BinProvider>> =
            self.providers.iter().filter(|provider| provider.name == provider_name).cloned().collect();
        if providers.is_empty() {
            return Err(BinError::UnknownProvider {
                name: provider_name.to_string(),
                suggestion: crate::provider::closest_name(
                    provider_name,
                    self.providers.iter().map(|provider| provider.name.as_str()),
                ),
            });
        }
        Ok(Self {
            providers,
            ..self.clone()
        })
    }

    fn command<I, S>(&self, args: I) -> Result<ProcessCommand>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(abspath) = self.loaded.as_ref().filter(|loaded| loaded.is_valid()).and_then(|l| l.abspath.as_ref())
        else {
            return Err(BinError::NotLoaded {
                name: self.name.clone(),
            });
        };
        Ok(ProcessCommand::new(abspath).args(args).with_context(self.name.as_str()))
    }

    /// Run the resolved binary with `args` and capture its output unmodified.
    ///
    /// The child reads this process's stdin; stdout and stderr come back as raw bytes.
    ///
    /// # Errors
    ///
    /// - [`BinError::NotLoaded`] unless the binary is valid
    /// - [`BinError::Io`] when the process cannot be spawned
    pub fn exec<I, S>(&self, args: I) -> Result<RawOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(args)?.execute_raw()
    }

    /// Run the resolved binary attached to this process's stdin, stdout and stderr.
    ///
    /// Returns the exit code, `None` when the child was killed by a signal.
    ///
    /// # Errors
    ///
    /// As for [`exec`](Self::exec).
    pub fn exec_attached<I, S>(&self, args: I) -> Result<Option<i32>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(args)?.status()
    }

    /// Every provider's matches for this binary, without adopting any of them.
    ///
    /// # Errors
    ///
    /// Only [`BinError::OverrideResolution`].
    pub fn abspaths_by_provider(&self) -> Result<Vec<(String, Vec<PathBuf>)>> {
        self.providers
            .iter()
            .map(|provider| {
                let provider = self.configured(provider);
                Ok((provider.name.clone(), provider.get_abspaths(&self.name)?))
            })
            .collect()
    }

    /// Serializable view of this binary.
    #[must_use]
    pub fn snapshot(&self) -> BinaryRecord {
        let loaded = self.loaded.as_ref();
        BinaryRecord {
            name: self.name.clone(),
            description: self.description().to_string(),
            providers: self.providers.iter().map(|provider| provider.name.clone()).collect(),
            min_version: self.min_version.clone(),
            provider: loaded.map(|l| l.provider.clone()),
            abspath: loaded.and_then(|l| l.abspath.clone()),
            abspaths: loaded.map(|l| l.abspaths.clone()).unwrap_or_default(),
            version: loaded.and_then(|l| l.version),
            sha256: loaded.and_then(|l| l.sha256.clone()),
            is_valid: self.is_valid(),
            attempts: self.attempts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeBinDir, counting_provider, dir_provider};

    #[test]
    fn test_description_defaults_to_name() {
        let binary = Binary::new("wget", Vec::new());
        assert_eq!(binary.description(), "wget");
        assert_eq!(binary.with_description("downloader").description(), "downloader");
    }

    #[test]
    fn test_load_rejects_bad_names() {
        for name in ["", "/usr/bin/wget", "..\\tool"] {
            let binary = Binary::new(name, Vec::new());
            assert!(matches!(binary.load(), Err(BinError::Validation { .. })), "{name:?}");
            assert!(matches!(binary.install(), Err(BinError::Validation { .. })), "{name:?}");
        }
    }

    #[test]
    fn test_load_rejects_bad_min_version() {
        let binary = Binary::new("wget", Vec::new()).with_min_version("newest please");
        assert!(matches!(binary.load(), Err(BinError::Validation { .. })));
    }

    #[test]
    fn test_exec_before_load_is_not_loaded() {
        let binary = Binary::new("wget", Vec::new());
        assert!(matches!(binary.exec(["--version"]), Err(BinError::NotLoaded { .. })));
    }

    #[test]
    fn test_missingtool_is_invalid() {
        let dir = FakeBinDir::new();
        let binary = Binary::new("missingtool", vec![Arc::new(dir_provider("env", &dir))]);
        let loaded = binary.load().unwrap();

        assert!(!loaded.is_valid());
        assert!(loaded.abspath().is_none());
        assert!(loaded.version().is_none());
        assert!(loaded.abspaths().is_empty());
        assert_eq!(loaded.attempts().len(), 1);
        assert_eq!(loaded.attempts()[0].outcome, AttemptOutcome::NotFound);
        assert!(matches!(loaded.exec(Vec::<String>::new()), Err(BinError::NotLoaded { .. })));
    }

    #[test]
    fn test_install_exhaustion_lists_every_provider() {
        let dir = FakeBinDir::new();
        let binary = Binary::new(
            "missingtool",
            vec![Arc::new(dir_provider("first", &dir)), Arc::new(dir_provider("second", &dir))],
        );
        match binary.load_or_install().unwrap_err() {
            BinError::ResolutionFailed {
                name,
                attempts,
            } => {
                assert_eq!(name, "missingtool");
                let summary: Vec<(String, AttemptAction)> =
                    attempts.iter().map(|a| (a.provider.clone(), a.action)).collect();
                assert_eq!(
                    summary,
                    vec![
                        ("first".to_string(), AttemptAction::Load),
                        ("second".to_string(), AttemptAction::Load),
                        ("first".to_string(), AttemptAction::Install),
                        ("second".to_string(), AttemptAction::Install),
                    ]
                );
                assert!(matches!(attempts[2].outcome, AttemptOutcome::Unavailable { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_declaration_order_wins() {
        let a = FakeBinDir::new();
        let b = FakeBinDir::new();
        a.add("tool", "tool 1.0.0");
        b.add("tool", "tool 2.0.0");

        let binary = Binary::new(
            "tool",
            vec![Arc::new(dir_provider("alpha", &a)), Arc::new(dir_provider("beta", &b))],
        );
        let loaded = binary.load().unwrap();
        assert_eq!(loaded.provider(), Some("alpha"));
        assert_eq!(loaded.version(), Some(SemVer::new(1, 0, 0)));

        let reversed = Binary::new(
            "tool",
            vec![Arc::new(dir_provider("beta", &b)), Arc::new(dir_provider("alpha", &a))],
        );
        assert_eq!(reversed.load().unwrap().provider(), Some("beta"));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_returns_new_value() {
        let dir = FakeBinDir::new();
        dir.add("tool", "tool 1.0.0");
        let binary = Binary::new("tool", vec![Arc::new(dir_provider("fake", &dir))]);
        let loaded = binary.load().unwrap();
        assert!(loaded.is_valid());
        assert!(!binary.is_valid());
        assert!(binary.attempts().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_min_version_falls_through() {
        let old = FakeBinDir::new();
        let new = FakeBinDir::new();
        old.add("tool", "tool 1.9.0");
        new.add("tool", "tool 2.1.0");

        let binary = Binary::new(
            "tool",
            vec![Arc::new(dir_provider("old", &old)), Arc::new(dir_provider("new", &new))],
        )
        .with_min_version(">=2");
        let loaded = binary.load().unwrap();
        assert_eq!(loaded.provider(), Some("new"));
        assert_eq!(
            loaded.attempts()[0].outcome,
            AttemptOutcome::VersionMismatch {
                version: SemVer::new(1, 9, 0),
                requirement: ">=2".to_string(),
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unusable_path_recorded() {
        let dir = FakeBinDir::new();
        let tool = dir.add_script("tool", "echo garbage\n");
        let binary = Binary::new("tool", vec![Arc::new(dir_provider("fake", &dir))]);
        let loaded = binary.load().unwrap();
        assert!(!loaded.is_valid());
        assert!(loaded.abspath().is_none());
        assert_eq!(
            loaded.attempts()[0].outcome,
            AttemptOutcome::Unusable {
                abspath: tool
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_install_continues_after_unloadable_install() {
        let empty = FakeBinDir::new();
        let good = FakeBinDir::new();
        // installs "successfully" but never creates the binary
        let noop = dir_provider("noop", &empty).with_overrides(
            "*",
            &HookOverrides::new().install(crate::overrides::Handler::Literal("ok".to_string())),
        );
        let (counting, count) = counting_provider("counting", &good, "3.2.1");

        let binary = Binary::new("mytool", vec![Arc::new(noop), Arc::new(counting)]);
        let installed = binary.install().unwrap();
        assert_eq!(installed.provider(), Some("counting"));
        assert_eq!(installed.version(), Some(SemVer::new(3, 2, 1)));
        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(installed.attempts()[0].outcome, AttemptOutcome::NotFound);
        assert_eq!(installed.attempts()[0].action, AttemptAction::Install);
    }

    #[cfg(unix)]
    #[test]
    fn test_binary_overrides_apply_to_named_provider_only() {
        let dir = FakeBinDir::new();
        dir.add_script("tool", "exit 1\n");
        let binary = Binary::new("tool", vec![Arc::new(dir_provider("fake", &dir))])
            .with_override("other", HookOverrides::new().version(Some(SemVer::new(1, 0, 0))));
        assert!(!binary.load().unwrap().is_valid());

        let binary = binary.with_override("fake", HookOverrides::new().version(Some(SemVer::new(1, 0, 0))));
        assert!(binary.load().unwrap().is_valid());
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_passes_output_through() {
        let dir = FakeBinDir::new();
        dir.add_script(
            "tool",
            "if [ \"$1\" = \"--version\" ]; then echo 'tool 1.0.0'; exit 0; fi\necho \"out:$*\"\necho 'err' >&2\nexit 7\n",
        );
        let binary = Binary::new("tool", vec![Arc::new(dir_provider("fake", &dir))]).load().unwrap();
        let output = binary.exec(["a", "b"]).unwrap();
        assert_eq!(output.code, Some(7));
        assert_eq!(output.stdout, b"out:a b\n");
        assert_eq!(output.stderr, b"err\n");
        assert_eq!(binary.exec_attached(["a"]).unwrap(), Some(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_keeps_non_utf8_bytes() {
        let dir = FakeBinDir::new();
        dir.add_script(
            "blob",
            "if [ \"$1\" = \"--version\" ]; then echo 'blob 1.0.0'; exit 0; fi\nprintf '\\377\\376A'\n",
        );
        let binary = Binary::new("blob", vec![Arc::new(dir_provider("fake", &dir))]).load().unwrap();
        let output = binary.exec(Vec::<String>::new()).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, vec![0xff, 0xfe, b'A']);
    }

    #[cfg(unix)]
    #[test]
    fn test_only_restricts_to_one_provider() {
        let a = FakeBinDir::new();
        let b = FakeBinDir::new();
        a.add("tool", "tool 1.0.0");
        let in_b = b.add("tool", "tool 2.0.0");
        let binary =
            Binary::new("tool", vec![Arc::new(dir_provider("alpha", &a)), Arc::new(dir_provider("beta", &b))]);

        let loaded = binary.only("beta").unwrap().load().unwrap();
        assert_eq!(loaded.provider(), Some("beta"));
        assert_eq!(loaded.abspath(), Some(in_b.as_path()));
        assert_eq!(loaded.attempts().len(), 1);
        assert_eq!(binary.providers.len(), 2);

        match binary.only("bta").unwrap_err() {
            BinError::UnknownProvider {
                name,
                suggestion,
            } => {
                assert_eq!(name, "bta");
                assert_eq!(suggestion.as_deref(), Some("beta"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_abspaths_by_provider() {
        let a = FakeBinDir::new();
        let b = FakeBinDir::new();
        let in_a = a.add("tool", "tool 1.0.0");
        let in_b = b.add("tool", "tool 2.0.0");
        let binary =
            Binary::new("tool", vec![Arc::new(dir_provider("alpha", &a)), Arc::new(dir_provider("beta", &b))]);

        assert_eq!(
            binary.abspaths_by_provider().unwrap(),
            vec![("alpha".to_string(), vec![in_a.clone()]), ("beta".to_string(), vec![in_b])]
        );
        // the snapshot only carries the winner's matches
        assert_eq!(binary.load().unwrap().abspaths(), &[in_a]);
    }

    #[cfg(unix)]
    #[test]
    fn test_snapshot_round_trip() {
        let dir = FakeBinDir::new();
        dir.add("tool", "tool 1.2.3");
        let binary = Binary::new("tool", vec![Arc::new(dir_provider("fake", &dir))]).load().unwrap();

        let record = binary.snapshot();
        let json = serde_json::to_string(&record).unwrap();
        let back: BinaryRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back, record);
        assert!(back.is_valid);
        assert_eq!(back.provider.as_deref(), Some("fake"));
        assert_eq!(back.abspath.as_deref(), binary.abspath());
        assert_eq!(back.version, Some(SemVer::new(1, 2, 3)));
        assert_eq!(back.sha256.as_deref(), binary.sha256());
        assert_eq!(back.loaded().as_ref(), binary.loaded());
    }
}
