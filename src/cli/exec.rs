//! `exec` subcommand.

use anyhow::{Context, Result};
use clap::Args;

use super::CliConfig;
use crate::config::Config;
use crate::core::BinError;
use crate::utils::progress::ProgressBar;

/// Resolve a binary and run it.
#[derive(Args, Debug)]
pub struct ExecCommand {
    /// Binary name
    pub name: String,

    /// Providers to try, in order (repeatable); defaults to the configured order
    #[arg(short, long = "provider", value_name = "PROVIDER")]
    pub providers: Vec<String>,

    /// Install the binary when it cannot be loaded
    #[arg(long)]
    pub install: bool,

    /// Arguments passed to the binary
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl ExecCommand {
    /// Run the binary on this terminal's stdio and return its exit code.
    pub fn execute(self, config: &Config, cli: &CliConfig) -> Result<i32> {
        let binary = config.binary(&self.name, &self.providers)?;
        let binary = if self.install {
            let spinner = ProgressBar::new_spinner(cli.no_progress || cli.quiet);
            spinner.set_message(format!("Resolving {}...", self.name));
            let result = binary.load_or_install();
            spinner.finish_and_clear();
            result?
        } else {
            binary.load()?
        };

        if !binary.is_valid() {
            return Err(BinError::ResolutionFailed {
                name: binary.name.clone(),
                attempts: binary.attempts().to_vec(),
            }
            .into());
        }

        let code = binary.exec_attached(self.args).with_context(|| format!("Failed to run {}", self.name))?;

        // killed by a signal
        Ok(code.unwrap_or(1))
    }
}
