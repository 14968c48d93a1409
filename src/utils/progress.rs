//! Progress spinners for long-running installs
//!
//! Installs can take minutes (`apt-get update`, `brew install`). The CLI shows an
//! `indicatif` spinner while they run. Spinners are hidden when
//! `BINRESOLVE_NO_PROGRESS` is set or the caller asks for quiet output.
//!
//! # Examples
//!
//! ```rust
//! use binresolve::utils::progress::ProgressBar;
//!
//! let spinner = ProgressBar::new_spinner(false);
//! spinner.set_message("Installing wget via apt...");
//! spinner.finish_with_message("Installed wget 1.24.5");
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV_VAR;

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV_VAR).is_some()
}

/// A spinner with binresolve styling that can be hidden.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a spinner for indeterminate work.
    ///
    /// The spinner is hidden when `hidden` is `true` or `BINRESOLVE_NO_PROGRESS` is
    /// set; a hidden spinner silently ignores every call.
    #[must_use]
    pub fn new_spinner(hidden: bool) -> Self {
        let bar = if hidden || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Sets the message displayed next to the spinner.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Stops the spinner and leaves `msg` on screen.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Stops the spinner and removes it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Whether the spinner draws anything.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_ignores_calls() {
        let spinner = ProgressBar::new_spinner(true);
        assert!(spinner.is_hidden());
        spinner.set_message("working");
        spinner.finish_and_clear();
    }
}
