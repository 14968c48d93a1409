//! Global constants used throughout the binresolve codebase.
//!
//! Installer arguments, search locations and environment variable names that more
//! than one module needs live here so they are discoverable in one place.

/// Search path used by the `env` provider when `PATH` is unset.
#[cfg(unix)]
pub const DEFAULT_PATH: &str = "/home/linuxbrew/.linuxbrew/bin:/opt/homebrew/bin:/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Search path used by the `env` provider when `PATH` is unset.
#[cfg(not(unix))]
pub const DEFAULT_PATH: &str = r"C:\Windows\System32;C:\Windows";

/// Arguments tried in order to make a binary print its version.
pub const VERSION_ARGS: [&str; 3] = ["--version", "-version", "-v"];

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "BINRESOLVE_CONFIG";

/// Environment variable disabling progress spinners.
pub const NO_PROGRESS_ENV_VAR: &str = "BINRESOLVE_NO_PROGRESS";

/// Directory under the home directory holding the configuration file.
pub const CONFIG_DIR_NAME: &str = ".binresolve";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Provider order used when the configuration does not name one.
pub const DEFAULT_PROVIDERS: [&str; 1] = ["env"];

/// Extensions treated as interpreted scripts rather than native executables.
pub const SCRIPT_EXTENSIONS: [&str; 3] = ["py", "js", "sh"];

/// Fixed Homebrew install locations searched in addition to `brew --prefix`.
pub const BREW_BIN_DIRS: [&str; 3] =
    ["/home/linuxbrew/.linuxbrew/bin", "/opt/homebrew/bin", "/usr/local/bin"];

/// Arguments passed to `apt-get` before installing.
pub const APT_PRE_INSTALL_ARGS: [&str; 2] = ["update", "-qq"];

/// Arguments placed before the package list for `apt-get`.
pub const APT_INSTALL_ARGS: [&str; 2] = ["install", "-y"];

/// Arguments placed before the package list for `brew`.
pub const BREW_INSTALL_ARGS: [&str; 1] = ["install"];

/// Arguments placed before the package list for `pip`.
pub const PIP_INSTALL_ARGS: [&str; 4] =
    ["install", "--no-input", "--disable-pip-version-check", "--quiet"];

/// Arguments placed before the package list for `npm`.
pub const NPM_INSTALL_ARGS: [&str; 6] =
    ["install", "--force", "--no-save", "--no-audit", "--no-fund", "--loglevel=error"];
