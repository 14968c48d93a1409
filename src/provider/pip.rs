//! The `pip` provider: Python packages, system-wide or in a virtualenv.

use std::path::{Path, PathBuf};

use super::{BinProvider, Bootstrap, InstallerSpec, search};
use crate::constants::PIP_INSTALL_ARGS;
use crate::core::Result;
use crate::utils::ProcessCommand;
use crate::utils::platform::{dedupe_paths, system_path};

/// Provider name.
pub const NAME: &str = "pip";

/// Options for the `pip` provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipOptions {
    /// Virtualenv to install into; `None` uses the system `pip`
    pub venv: Option<PathBuf>,
    /// Replaces the default flags placed after `install`
    pub install_args: Option<Vec<String>>,
}

/// `pip install --no-input --disable-pip-version-check --quiet <packages>`.
///
/// With a virtualenv the installer is `<venv>/bin/pip` and the search path is
/// `<venv>/bin`; the virtualenv is created with `python3 -m venv` before the first
/// install. Without one, the search path is the directories of every `python` and
/// `python3` on `PATH` plus the user scripts directory.
///
/// # Errors
///
/// Never fails for the built-in name; the `Result` mirrors the other constructors.
pub fn provider(options: &PipOptions) -> Result<BinProvider> {
    let mut args = vec!["install".to_string()];
    match &options.install_args {
        Some(custom) => args.extend(custom.iter().cloned()),
        None => args.extend(PIP_INSTALL_ARGS.iter().skip(1).map(|arg| (*arg).to_string())),
    }

    let (installer, search_path) = match &options.venv {
        Some(venv) => {
            let bin_dir = venv.join("bin");
            let pip = bin_dir.join("pip");
            let installer = InstallerSpec::new(pip.to_string_lossy()).args(args).bootstrap(Bootstrap {
                program: "python3".to_string(),
                args: vec!["-m".to_string(), "venv".to_string(), venv.to_string_lossy().into_owned()],
                creates: pip,
            });
            (installer, vec![bin_dir])
        }
        None => (InstallerSpec::new(NAME).args(args), system_bin_dirs()),
    };

    Ok(BinProvider::new(NAME)?.with_installer(installer).with_search_path(search_path))
}

fn system_bin_dirs() -> Vec<PathBuf> {
    let path = system_path();
    let interpreters: Vec<PathBuf> =
        ["python", "python3"].iter().flat_map(|name| search::find_all(name, &path)).collect();

    let user_scripts = interpreters.first().and_then(|python| user_scripts_dir(python));

    dedupe_paths(
        interpreters
            .iter()
            .filter_map(|python| python.parent().map(Path::to_path_buf))
            .chain(user_scripts),
    )
}

fn user_scripts_dir(python: &Path) -> Option<PathBuf> {
    let output = ProcessCommand::new(python).args(["-m", "site", "--user-base"]).execute().ok()?;
    let base = output.stdout.trim();
    (output.success() && !base.is_empty()).then(|| PathBuf::from(base).join("bin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_install_args() {
        let provider = provider(&PipOptions::default()).unwrap();
        let installer = provider.installer.unwrap();
        assert_eq!(installer.bin, "pip");
        assert_eq!(
            installer.args,
            vec!["install", "--no-input", "--disable-pip-version-check", "--quiet"]
        );
        assert!(installer.bootstrap.is_none());
    }

    #[test]
    fn test_venv_installer_and_search_path() {
        let options = PipOptions {
            venv: Some(PathBuf::from("/opt/binresolve/venv")),
            install_args: Some(vec!["--upgrade".to_string()]),
        };
        let provider = provider(&options).unwrap();
        assert_eq!(provider.search_path, vec![PathBuf::from("/opt/binresolve/venv/bin")]);

        let installer = provider.installer.unwrap();
        assert_eq!(installer.bin, "/opt/binresolve/venv/bin/pip");
        assert_eq!(installer.args, vec!["install", "--upgrade"]);
        let bootstrap = installer.bootstrap.unwrap();
        assert_eq!(bootstrap.args, vec!["-m", "venv", "/opt/binresolve/venv"]);
        assert_eq!(bootstrap.creates, PathBuf::from("/opt/binresolve/venv/bin/pip"));
    }
}
