//! Configuration for binresolve
//!
//! A single TOML file declares the default provider order, options for the
//! built-in providers and the binaries an application depends on.
//!
//! # Location
//!
//! 1. `--config <path>` on the command line (must exist)
//! 2. `BINRESOLVE_CONFIG` environment variable
//! 3. `~/.binresolve/config.toml`
//!
//! A missing file in the last two locations is not an error: the defaults
//! (`providers = ["env"]`) apply.
//!
//! # File Format
//!
//! ```toml
//! providers = ["env", "brew", "apt"]   # default provider order
//!
//! [env]
//! path = ["~/bin"]                      # searched before PATH
//!
//! [pip]
//! venv = "~/.local/share/binresolve/venv"
//! install_args = ["--no-input"]
//!
//! [npm]
//! prefix = "~/.local/share/binresolve/npm"
//!
//! [binaries.yt-dlp]
//! description = "video downloader"
//! providers = ["pip", "brew"]
//! min_version = ">=2024.1"
//!
//! [binaries.yt-dlp.overrides.pip]
//! packages = ["yt-dlp[default]"]
//! handlers = { install = "myapp.install_ytdlp" }
//! ```
//!
//! Paths accept `~/` and `$VAR`. `handlers` values name functions registered in the
//! [`HandlerRegistry`](crate::overrides::HandlerRegistry); they are looked up when
//! the hook fires, not when the file is loaded.

mod binaries;
mod global;
mod parser;

pub use binaries::{BinaryConfig, OverrideConfig};
pub use global::{Config, EnvConfig, NpmConfig, PipConfig};
pub use parser::parse_config;
