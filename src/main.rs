//! binresolve CLI entry point
//!
//! Parses arguments, runs the command and renders failures through
//! [`user_friendly_error`] before exiting with status 1.

use binresolve::cli;
use binresolve::core::error::user_friendly_error;
use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
