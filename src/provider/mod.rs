//! Binary providers: the mechanisms that locate and install executables
//!
//! A [`BinProvider`] is plain configuration: a name, an optional installer, the
//! directories it searches, and a [`HookTable`] of per-binary overrides. It keeps no
//! per-binary state; every call looks at the filesystem again.
//!
//! # Operations
//!
//! | Operation | Hook | Default |
//! |-----------|------|---------|
//! | [`get_installer_abspath`](BinProvider::get_installer_abspath) | `installer` | installer on the search path, then on `PATH` |
//! | [`get_packages`](BinProvider::get_packages) | `packages` | `[bin_name]` |
//! | [`get_abspaths`](BinProvider::get_abspaths) | `abspath` (placed first) | every match on the search path |
//! | [`get_abspath`](BinProvider::get_abspath) | `abspath` | first match on the search path |
//! | [`get_version`](BinProvider::get_version) | `version` | run `--version`, `-version`, then `-v` |
//! | [`get_sha256`](BinProvider::get_sha256) | `sha256` | SHA-256 of the file |
//! | [`install`](BinProvider::install) | `install` | run the installer |
//!
//! Only `install` changes the host. A hook that fails (a computed handler returning
//! an error, a version command printing garbage) falls back to the default behaviour
//! and is logged at debug level. Unresolvable external handler names abort with
//! [`BinError::OverrideResolution`].
//!
//! # Built-in providers
//!
//! - [`env`] - read-only lookup on `PATH`
//! - [`apt`] - `apt-get install -y`
//! - [`brew`] - `brew install`
//! - [`pip`] - `pip install`, optionally into a virtualenv
//! - [`npm`] - `npm install`, globally or under a prefix
//!
//! Construct them by name with [`builtin`].

pub mod apt;
pub mod brew;
pub mod env;
mod loaded;
pub mod npm;
pub mod pip;
pub mod search;


pub use loaded::LoadedBinary;
pub use npm::NpmOptions;
pub use pip::PipOptions;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::constants::VERSION_ARGS;
use crate::core::{BinError, Result};
use crate::overrides::{Handler, HandlerRegistry, Hook, HookContext, HookOverrides, HookTable};
use crate::utils::platform::{current_uid, dedupe_paths, owner_uid};
use crate::utils::{ProcessCommand, sha256_file, validate_provider_name};
use crate::version::SemVer;

/// Names accepted by [`builtin`].
pub const BUILTIN_PROVIDERS: [&str; 5] = [env::NAME, apt::NAME, brew::NAME, pip::NAME, npm::NAME];

/// One-time preparation run before installing when `creates` is missing, e.g.
/// creating the virtualenv that holds the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    /// Program to run, bare name or absolute path
    pub program: String,
    /// Arguments for the program
    pub args: Vec<String>,
    /// Path whose existence means the bootstrap already ran
    pub creates: PathBuf,
}

/// User the installer runs as.
///
/// Only takes effect on Unix when binresolve runs as root and the target user
/// differs; otherwise the installer runs as the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAs {
    /// A fixed user id
    User(u32),
    /// Whoever owns the installer binary (Homebrew refuses to run as root)
    InstallerOwner,
}

/// How a provider installs packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerSpec {
    /// Installer binary, bare name or absolute path (`apt-get`, `/venv/bin/pip`)
    pub bin: String,
    /// Arguments for a command run before installing (`update -qq`)
    pub pre_install: Option<Vec<String>>,
    /// Arguments placed before the package list (`install -y`)
    pub args: Vec<String>,
    /// Optional one-time preparation
    pub bootstrap: Option<Bootstrap>,
    /// User to drop to when running the installer
    pub run_as: Option<RunAs>,
}

impl InstallerSpec {
    /// Installer invoked as `<bin> <packages…>`.
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            pre_install: None,
            args: Vec::new(),
            bootstrap: None,
            run_as: None,
        }
    }

    /// Run `<bin> <args…>` before every install.
    #[must_use]
    pub fn pre_install<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pre_install = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Arguments placed before the package list.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// One-time preparation before the first install.
    #[must_use]
    pub fn bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Run the pre-install and install commands as another user.
    #[must_use]
    pub fn run_as(mut self, run_as: RunAs) -> Self {
        self.run_as = Some(run_as);
        self
    }

    /// User id to switch to before running `installer`, `None` to stay as the
    /// current user.
    #[must_use]
    pub fn effective_uid(&self, installer: &Path) -> Option<u32> {
        let wanted = match self.run_as? {
            RunAs::User(uid) => uid,
            RunAs::InstallerOwner => owner_uid(installer)?,
        };
        let current = current_uid()?;
        if wanted == current {
            return None;
        }
        if current != 0 {
            debug!(target: "provider", "Not root, running {} as uid {} instead of {}", self.bin, current, wanted);
            return None;
        }
        Some(wanted)
    }
}

/// A mechanism for locating, and optionally installing, binaries.
///
/// # Examples
///
/// ```rust,no_run
/// use binresolve::provider::{BinProvider, InstallerSpec};
///
/// # fn example() -> binresolve::core::Result<()> {
/// let provider = BinProvider::new("apk")?
///     .with_installer(InstallerSpec::new("apk").args(["add", "--no-cache"]))
///     .with_search_path(vec!["/usr/bin".into(), "/bin".into()]);
///
/// let loaded = provider.load_or_install("curl")?;
/// println!("{:?} {:?}", loaded.abspath, loaded.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BinProvider {
    /// Unique provider name
    pub name: String,
    /// Installer, `None` for read-only providers
    pub installer: Option<InstallerSpec>,
    /// Directories searched for binaries, in priority order
    pub search_path: Vec<PathBuf>,
    /// Per-binary hook overrides
    pub hooks: HookTable,
    registry: Arc<HandlerRegistry>,
}

/// Serializable summary of a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Provider name
    pub name: String,
    /// Installer binary name, if the provider can install
    pub installer: Option<String>,
    /// Installer location on this host
    pub installer_abspath: Option<PathBuf>,
    /// Directories searched for binaries
    pub search_path: Vec<PathBuf>,
}

impl BinProvider {
    /// Read-only provider with an empty search path and the global
    /// [`HandlerRegistry`].
    ///
    /// # Errors
    ///
    /// Returns [`BinError::Validation`] for names that are not 2-15 characters of
    /// `[A-Za-z0-9_]` starting with a letter.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_provider_name(&name)?;
        Ok(Self {
            name,
            installer: None,
            search_path: Vec::new(),
            hooks: HookTable::default(),
            registry: HandlerRegistry::global(),
        })
    }

    /// Set the installer.
    #[must_use]
    pub fn with_installer(mut self, installer: InstallerSpec) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Set the search path.
    #[must_use]
    pub fn with_search_path(mut self, search_path: Vec<PathBuf>) -> Self {
        self.search_path = search_path;
        self
    }

    /// Resolve external handler names through `registry` instead of the global one.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<HandlerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Copy of this provider with `overrides` inserted under `bin_name`
    /// (or `*` for every binary).
    #[must_use]
    pub fn with_overrides(&self, bin_name: &str, overrides: &HookOverrides) -> Self {
        let mut provider = self.clone();
        provider.hooks.insert(bin_name, overrides);
        provider
    }

    /// Registry used for [`Handler::External`] lookups.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Evaluate `handler`, turning handler failures into `None`.
    fn run_hook<T: Clone + 'static>(
        &self,
        hook: Hook,
        handler: &Handler<T>,
        ctx: &HookContext<'_>,
    ) -> Result<Option<T>> {
        match handler.evaluate(hook, ctx)? {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(
                    target: "provider",
                    "[{}] {} hook for '{}' failed, using default: {:#}",
                    self.name,
                    hook,
                    ctx.bin_name,
                    e
                );
                Ok(None)
            }
        }
    }

    /// Location of this provider's installer, `None` when it has none or it is
    /// missing on this host.
    ///
    /// # Errors
    ///
    /// Only [`BinError::OverrideResolution`].
    pub fn get_installer_abspath(&self, bin_name: &str) -> Result<Option<PathBuf>> {
        if let Some(handler) = self.hooks.installer.lookup(bin_name) {
            let ctx = HookContext::new(self, bin_name);
            if let Some(Some(path)) = self.run_hook(Hook::Installer, handler, &ctx)? {
                return Ok(Some(path));
            }
        }
        Ok(self.installer.as_ref().and_then(|spec| search::find_installer(&spec.bin, &self.search_path)))
    }

    /// Packages to install for `bin_name`; never empty.
    ///
    /// # Errors
    ///
    /// Only [`BinError::OverrideResolution`].
    pub fn get_packages(&self, bin_name: &str) -> Result<Vec<String>> {
        let packages = match self.hooks.packages.lookup(bin_name) {
            Some(handler) => {
                let ctx = HookContext::new(self, bin_name);
                self.run_hook(Hook::Packages, handler, &ctx)?.unwrap_or_default()
            }
            None => Vec::new(),
        };
        if packages.is_empty() { Ok(vec![bin_name.to_string()]) } else { Ok(packages) }
    }

    fn abspath_override(&self, bin_name: &str) -> Result<Option<PathBuf>> {
        let Some(handler) = self.hooks.abspath.lookup(bin_name) else {
            return Ok(None);
        };
        let ctx = HookContext::new(self, bin_name);
        Ok(self.run_hook(Hook::Abspath, handler, &ctx)?.flatten())
    }

    /// Every match for `bin_name`, the `abspath` override (if any) first.
    ///
    /// # Errors
    ///
    /// Only [`BinError::OverrideResolution`].
    pub fn get_abspaths(&self, bin_name: &str) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = self.abspath_override(bin_name)?.into_iter().collect();
        paths.extend(search::find_all(bin_name, &self.search_path));
        Ok(dedupe_paths(paths))
    }

    /// Primary path of `bin_name`.
    ///
    /// # Errors
    ///
    /// Only [`BinError::OverrideResolution`].
    pub fn get_abspath(&self, bin_name: &str) -> Result<Option<PathBuf>> {
        match self.abspath_override(bin_name)? {
            Some(path) => Ok(Some(path)),
            None => Ok(search::find_first(bin_name, &self.search_path)),
        }
    }

    /// Version of the binary at `abspath`.
    ///
    /// # Errors
    ///
    /// Only [`BinError::OverrideResolution`].
    pub fn get_version(&self, bin_name: &str, abspath: &Path) -> Result<Option<SemVer>> {
        if let Some(handler) = self.hooks.version.lookup(bin_name) {
            let ctx = HookContext::new(self, bin_name).with_abspath(abspath);
            if let Some(version) = self.run_hook(Hook::Version, handler, &ctx)? {
                return Ok(version);
            }
        }
        Ok(self.probe_version(bin_name, abspath))
    }

    fn probe_version(&self, bin_name: &str, abspath: &Path) -> Option<SemVer> {
        for arg in VERSION_ARGS {
            let output = match ProcessCommand::new(abspath).arg(arg).with_context(bin_name).execute() {
                Ok(output) => output,
                Err(e) => {
                    debug!(target: "provider", "[{}] Cannot run {}: {}", self.name, abspath.display(), e);
                    return None;
                }
            };
            match SemVer::parse(output.text()) {
                Ok(version) => return Some(version),
                Err(e) => debug!(target: "provider", "[{}] {} {}: {}", self.name, bin_name, arg, e),
            }
        }
        None
    }

    /// SHA-256 of the binary at `abspath`.
    ///
    /// # Errors
    ///
    /// Only [`BinError::OverrideResolution`].
    pub fn get_sha256(&self, bin_name: &str, abspath: &Path) -> Result<Option<String>> {
        if let Some(handler) = self.hooks.sha256.lookup(bin_name) {
            let ctx = HookContext::new(self, bin_name).with_abspath(abspath);
            if let Some(hash) = self.run_hook(Hook::Sha256, handler, &ctx)? {
                return Ok(hash);
            }
        }
        match sha256_file(abspath) {
            Ok(hash) => Ok(Some(hash)),
            Err(e) => {
                debug!(target: "provider", "[{}] Cannot hash {}: {}", self.name, abspath.display(), e);
                Ok(None)
            }
        }
    }

    /// Install `bin_name`, returning the installer's log.
    ///
    /// # Errors
    ///
    /// - [`BinError::ProviderUnavailable`] when the installer binary is missing, or the
    ///   provider has neither an installer nor an `install` override
    /// - [`BinError::InstallError`] when the installer exits non-zero or an `install`
    ///   handler fails
    /// - [`BinError::OverrideResolution`] for unresolvable handler names
    pub fn install(&self, bin_name: &str) -> Result<String> {
        let handler = self.hooks.install.lookup(bin_name);

        let installer = match &self.installer {
            Some(spec) => {
                self.run_bootstrap(spec, bin_name)?;
                let path = self.get_installer_abspath(bin_name)?.ok_or_else(|| {
                    BinError::ProviderUnavailable {
                        provider: self.name.clone(),
                        reason: format!("{} not found in PATH", spec.bin),
                    }
                })?;
                Some((spec, path))
            }
            None if handler.is_some() => None,
            None => {
                return Err(BinError::ProviderUnavailable {
                    provider: self.name.clone(),
                    reason: "provider has no installer".to_string(),
                });
            }
        };

        let packages = self.get_packages(bin_name)?;
        info!(target: "provider", "[{}] Installing {} ({})", self.name, bin_name, packages.join(" "));

        match (handler, installer) {
            (Some(handler), _) => {
                let ctx = HookContext::new(self, bin_name).with_packages(&packages);
                handler.evaluate(Hook::Install, &ctx)?.map_err(|e| match e.downcast::<BinError>() {
                    Ok(error) => error,
                    Err(e) => BinError::InstallError {
                        provider: self.name.clone(),
                        name: bin_name.to_string(),
                        packages: packages.clone(),
                        code: None,
                        stdout: String::new(),
                        stderr: format!("{e:#}"),
                    },
                })
            }
            (None, Some((spec, path))) => self.run_installer(bin_name, spec, &path, &packages),
            (None, None) => Err(BinError::ProviderUnavailable {
                provider: self.name.clone(),
                reason: "provider has no installer".to_string(),
            }),
        }
    }

    fn run_bootstrap(&self, spec: &InstallerSpec, bin_name: &str) -> Result<()> {
        let Some(bootstrap) = &spec.bootstrap else {
            return Ok(());
        };
        if bootstrap.creates.exists() {
            return Ok(());
        }
        let Some(program) = search::find_installer(&bootstrap.program, &[]) else {
            debug!(target: "provider", "[{}] Bootstrap program {} not found", self.name, bootstrap.program);
            return Ok(());
        };
        info!(target: "provider", "[{}] Preparing installer: {} {}", self.name, bootstrap.program, bootstrap.args.join(" "));
        let output = ProcessCommand::new(program).args(bootstrap.args.iter().cloned()).with_context(bin_name).execute()?;
        if !output.success() {
            warn!(target: "provider", "[{}] Installer preparation failed: {}", self.name, output.stderr.trim());
        }
        Ok(())
    }

    fn run_installer(
        &self,
        bin_name: &str,
        spec: &InstallerSpec,
        installer: &Path,
        packages: &[String],
    ) -> Result<String> {
        let mut log = String::new();
        let uid = spec.effective_uid(installer);

        if let Some(pre_install) = &spec.pre_install {
            let output = ProcessCommand::new(installer)
                .args(pre_install.iter().cloned())
                .run_as(uid)
                .with_context(bin_name)
                .execute()?;
            if !output.success() {
                // a stale package index is not fatal, the install may still succeed
                debug!(
                    target: "provider",
                    "[{}] {} {} exited with {:?}",
                    self.name,
                    spec.bin,
                    pre_install.join(" "),
                    output.code
                );
            }
            log.push_str(output.stdout.trim());
        }

        let output = ProcessCommand::new(installer)
            .args(spec.args.iter().cloned())
            .args(packages.iter().cloned())
            .run_as(uid)
            .with_context(bin_name)
            .execute()?;

        if !output.success() {
            warn!(
                target: "provider",
                "[{}] Installing {} failed with exit code {:?}",
                self.name,
                bin_name,
                output.code
            );
            return Err(BinError::InstallError {
                provider: self.name.clone(),
                name: bin_name.to_string(),
                packages: packages.to_vec(),
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        for part in [output.stderr.trim(), output.stdout.trim()] {
            if !part.is_empty() {
                if !log.is_empty() {
                    log.push('\n');
                }
                log.push_str(part);
            }
        }
        info!(target: "provider", "[{}] Installed {}", self.name, packages.join(" "));
        Ok(log)
    }

    /// Look `bin_name` up without installing anything.
    ///
    /// A binary that is not found yields an invalid [`LoadedBinary`], not an error.
    ///
    /// # Errors
    ///
    /// Only [`BinError::OverrideResolution`].
    pub fn load(&self, bin_name: &str) -> Result<LoadedBinary> {
        let abspaths = self.get_abspaths(bin_name)?;
        let mut loaded = LoadedBinary::empty(bin_name, &self.name);
        if let Some(abspath) = abspaths.first() {
            loaded.version = self.get_version(bin_name, abspath)?;
            loaded.sha256 = self.get_sha256(bin_name, abspath)?;
            loaded.abspath = Some(abspath.clone());
        }
        loaded.abspaths = abspaths;

        debug!(
            target: "provider",
            "[{}] Loaded {}: abspath={:?} version={:?}",
            self.name,
            bin_name,
            loaded.abspath,
            loaded.version.map(|v| v.to_string())
        );
        Ok(loaded)
    }

    /// [`load`](Self::load), installing first when the binary is not valid.
    ///
    /// # Errors
    ///
    /// Any error from [`install`](Self::install).
    pub fn load_or_install(&self, bin_name: &str) -> Result<LoadedBinary> {
        let loaded = self.load(bin_name)?;
        if loaded.is_valid() {
            return Ok(loaded);
        }
        self.install(bin_name)?;
        self.load(bin_name)
    }

    /// Serializable summary of this provider.
    #[must_use]
    pub fn record(&self) -> ProviderRecord {
        let installer_abspath = self
            .installer
            .as_ref()
            .and_then(|spec| search::find_installer(&spec.bin, &self.search_path));
        ProviderRecord {
            name: self.name.clone(),
            installer: self.installer.as_ref().map(|spec| spec.bin.clone()),
            installer_abspath,
            search_path: self.search_path.clone(),
        }
    }
}

/// Options for the built-in providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    /// Extra directories the `env` provider searches before `PATH`
    pub env_path: Vec<PathBuf>,
    /// `pip` provider options
    pub pip: PipOptions,
    /// `npm` provider options
    pub npm: NpmOptions,
}

/// Construct a built-in provider by name.
///
/// # Errors
///
/// Returns [`BinError::UnknownProvider`], with the closest built-in name as a
/// suggestion, for names not in [`BUILTIN_PROVIDERS`].
pub fn builtin(name: &str, options: &ProviderOptions) -> Result<BinProvider> {
    match name {
        env::NAME => env::provider(&options.env_path),
        apt::NAME => apt::provider(),
        brew::NAME => brew::provider(),
        pip::NAME => pip::provider(&options.pip),
        npm::NAME => npm::provider(&options.npm),
        other => Err(BinError::UnknownProvider {
            name: other.to_string(),
            suggestion: closest_builtin(other),
        }),
    }
}

pub(crate) fn closest_builtin(name: &str) -> Option<String> {
    closest_name(name, BUILTIN_PROVIDERS)
}

/// Candidate within edit distance 2 of `name`, the nearest one first.
pub(crate) fn closest_name<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|candidate| (candidate, strsim::levenshtein(name, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}
