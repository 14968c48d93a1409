//! `list` and `providers` subcommands.

use anyhow::{Result, anyhow};
use clap::Args;

use super::output::{OutputFormat, render_binaries, render_providers};
use crate::catalog::{get_all_binaries, get_binary};
use crate::config::Config;
use crate::provider::BUILTIN_PROVIDERS;

/// Show the binaries declared in the configuration.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Show only this binary
    pub name: Option<String>,

    /// Show declarations without looking the binaries up
    #[arg(long)]
    pub no_load: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ListCommand {
    /// Print the records.
    pub fn execute(self, config: &Config) -> Result<()> {
        let mut binaries = config.binaries()?;
        if !self.no_load {
            binaries = binaries.iter().map(|binary| binary.load()).collect::<Result<_, _>>()?;
        }

        let records = match &self.name {
            Some(name) => vec![
                get_binary(&binaries, name).ok_or_else(|| anyhow!("Binary '{name}' is not declared in the config"))?,
            ],
            None => get_all_binaries(&binaries),
        };
        println!("{}", render_binaries(&records, self.format)?);
        Ok(())
    }
}

/// Show providers, their installers and search paths.
#[derive(Args, Debug)]
pub struct ProvidersCommand {
    /// Show every built-in provider instead of the configured order
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ProvidersCommand {
    /// Print the records.
    pub fn execute(self, config: &Config) -> Result<()> {
        let names: Vec<String> = if self.all {
            BUILTIN_PROVIDERS.iter().map(ToString::to_string).collect()
        } else {
            config.providers.clone()
        };
        let records: Vec<_> = config.build_providers(&names)?.iter().map(|provider| provider.record()).collect();
        println!("{}", render_providers(&records, self.format)?);
        Ok(())
    }
}
