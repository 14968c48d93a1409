//! `load`, `install` and `ensure` subcommands.

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use super::CliConfig;
use super::output::{OutputFormat, render_binaries};
use crate::binary::Binary;
use crate::config::Config;
use crate::core::BinError;
use crate::utils::progress::ProgressBar;

/// What to do with each named binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Look up only
    Load,
    /// Install unconditionally
    Install,
    /// Look up, install when missing
    Ensure,
}

/// Arguments shared by the resolving subcommands.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Binary names
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Providers to try, in order (repeatable); defaults to the configured order
    #[arg(short, long = "provider", value_name = "PROVIDER")]
    pub providers: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ResolveCommand {
    /// Resolve every name and print the records.
    ///
    /// All names are attempted before failing so the output covers each of them.
    pub fn execute(self, mode: ResolveMode, config: &Config, cli: &CliConfig) -> Result<()> {
        let mut records = Vec::with_capacity(self.names.len());
        let mut failures = Vec::new();

        for name in &self.names {
            let binary = config
                .binary(name, &self.providers)
                .with_context(|| format!("Failed to configure providers for {name}"))?;

            match resolve(&binary, mode, cli) {
                Ok(resolved) if resolved.is_valid() => records.push(resolved.snapshot()),
                Ok(unresolved) => {
                    records.push(unresolved.snapshot());
                    failures.push(BinError::ResolutionFailed {
                        name: unresolved.name.clone(),
                        attempts: unresolved.attempts().to_vec(),
                    });
                }
                Err(BinError::ResolutionFailed {
                    name,
                    attempts,
                }) => {
                    let mut record = binary.snapshot();
                    record.attempts.clone_from(&attempts);
                    records.push(record);
                    failures.push(BinError::ResolutionFailed {
                        name,
                        attempts,
                    });
                }
                Err(e) => return Err(e).with_context(|| format!("Failed to resolve {name}")),
            }
        }

        println!("{}", render_binaries(&records, self.format)?);

        debug!(target: "cli", "{} of {} binaries resolved", records.len() - failures.len(), records.len());
        match failures.into_iter().next() {
            Some(first) => Err(first.into()),
            None => Ok(()),
        }
    }
}

fn resolve(binary: &Binary, mode: ResolveMode, cli: &CliConfig) -> crate::core::Result<Binary> {
    if mode == ResolveMode::Load {
        return binary.load();
    }

    let spinner = ProgressBar::new_spinner(cli.no_progress || cli.quiet);
    spinner.set_message(format!("Resolving {}...", binary.name));
    let result = match mode {
        ResolveMode::Install => binary.install(),
        _ => binary.load_or_install(),
    };
    spinner.finish_and_clear();
    result
}
