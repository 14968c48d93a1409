//! The `npm` provider: Node packages, globally or under a prefix.

use std::path::PathBuf;

use super::{BinProvider, InstallerSpec};
use crate::constants::NPM_INSTALL_ARGS;
use crate::core::Result;
use crate::utils::ProcessCommand;
use crate::utils::platform::dedupe_paths;

/// Provider name.
pub const NAME: &str = "npm";

/// Options for the `npm` provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpmOptions {
    /// Install prefix; `None` installs with `--global`
    pub prefix: Option<PathBuf>,
}

/// `npm install --force --no-save --no-audit --no-fund --loglevel=error <packages>`
/// with `--prefix=<prefix>` or `--global`.
///
/// Searches `<prefix>/node_modules/.bin` when a prefix is configured, the
/// `node_modules/.bin` of `npm prefix`, and `<npm prefix -g>/bin`.
///
/// # Errors
///
/// Never fails for the built-in name; the `Result` mirrors the other constructors.
pub fn provider(options: &NpmOptions) -> Result<BinProvider> {
    let mut args: Vec<String> = NPM_INSTALL_ARGS.iter().map(|arg| (*arg).to_string()).collect();
    match &options.prefix {
        Some(prefix) => args.push(format!("--prefix={}", prefix.display())),
        None => args.push("--global".to_string()),
    }

    let mut search_path: Vec<PathBuf> =
        options.prefix.iter().map(|prefix| prefix.join("node_modules").join(".bin")).collect();

    if let Ok(npm) = which::which(NAME) {
        if let Some(local) = npm_prefix(&npm, &["prefix"]) {
            search_path.push(local.join("node_modules").join(".bin"));
        }
        if let Some(global) = npm_prefix(&npm, &["prefix", "-g"]) {
            search_path.push(if cfg!(windows) { global } else { global.join("bin") });
        }
    }

    Ok(BinProvider::new(NAME)?
        .with_installer(InstallerSpec::new(NAME).args(args))
        .with_search_path(dedupe_paths(search_path)))
}

fn npm_prefix(npm: &std::path::Path, args: &[&str]) -> Option<PathBuf> {
    let output = ProcessCommand::new(npm).args(args.iter().copied()).execute().ok()?;
    let prefix = output.stdout.trim();
    (output.success() && !prefix.is_empty()).then(|| PathBuf::from(prefix))
}
