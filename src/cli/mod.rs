//! Command-line interface for binresolve.
//!
//! # Available Commands
//!
//! - `load` - Look binaries up through the configured providers, never installing
//! - `install` - Install binaries through the first provider that can
//! - `ensure` - Load, installing only what is missing
//! - `exec` - Resolve a binary and run it with the given arguments
//! - `list` - Show the binaries declared in the configuration
//! - `providers` - Show providers, their installers and search paths
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - Logging level (`RUST_LOG` wins when set)
//! - `--config <path>` - Configuration file instead of `~/.binresolve/config.toml`
//! - `--no-progress` - Hide spinners
//!
//! # Examples
//!
//! ```bash
//! binresolve load wget curl --format json
//! binresolve ensure yt-dlp --provider pip --provider brew
//! binresolve exec jq -- --sort-keys . data.json
//! binresolve --config ./tools.toml list
//! ```

mod exec;
mod list;
mod output;
mod resolve;

pub use exec::ExecCommand;
pub use list::{ListCommand, ProvidersCommand};
pub use output::{OutputFormat, render_binaries, render_providers};
pub use resolve::{ResolveCommand, ResolveMode};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter applied when `RUST_LOG` is unset; `None` disables logging
    pub log_level: Option<String>,
    /// Hide spinners
    pub no_progress: bool,
    /// Suppress everything but results and errors
    pub quiet: bool,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with logging and progress at their defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing when a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = match (std::env::var("RUST_LOG"), &self.log_level) {
            (Ok(_), _) => EnvFilter::from_default_env(),
            (Err(_), Some(level)) => EnvFilter::new(level),
            (Err(_), None) => return,
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the configuration file these settings point at.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load(self.config_path.as_deref())?)
    }
}

/// Locate, validate and install command-line binaries.
#[derive(Parser, Debug)]
#[command(
    name = "binresolve",
    about = "Locate, validate and install command-line binaries across package managers",
    version,
    author
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress logging and spinners.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable progress spinners.
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look binaries up without installing anything
    Load(ResolveCommand),

    /// Install binaries through the first provider that succeeds
    Install(ResolveCommand),

    /// Load binaries, installing the ones that are missing
    Ensure(ResolveCommand),

    /// Resolve a binary and run it
    Exec(ExecCommand),

    /// Show the binaries declared in the configuration
    List(ListCommand),

    /// Show providers and their installers
    Providers(ProvidersCommand),
}

impl Cli {
    /// Run the parsed command, returning the process exit code.
    pub fn execute(self) -> Result<i32> {
        let config = self.build_config();
        self.execute_with_config(&config)
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            quiet: self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Run the parsed command with explicit settings.
    pub fn execute_with_config(self, cli: &CliConfig) -> Result<i32> {
        cli.init_logging();
        let config = cli.load_config()?;

        match self.command {
            Commands::Load(cmd) => cmd.execute(ResolveMode::Load, &config, cli).map(|()| 0),
            Commands::Install(cmd) => cmd.execute(ResolveMode::Install, &config, cli).map(|()| 0),
            Commands::Ensure(cmd) => cmd.execute(ResolveMode::Ensure, &config, cli).map(|()| 0),
            Commands::Exec(cmd) => cmd.execute(&config, cli),
            Commands::List(cmd) => cmd.execute(&config).map(|()| 0),
            Commands::Providers(cmd) => cmd.execute(&config).map(|()| 0),
        }
    }
}
