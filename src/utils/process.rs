//! Blocking subprocess builder with captured output
//!
//! Every subprocess binresolve starts (version probes, installers, `exec`) goes through
//! [`ProcessCommand`], so argument construction, environment handling and logging are
//! consistent across providers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::Result;

/// Builder for constructing and executing a child process with captured output.
///
/// Unlike `std::process::Command`, a non-zero exit status is not an error here:
/// [`execute`](Self::execute) only fails when the process cannot be spawned at all.
/// Callers decide what a non-zero exit means (an install failure, a version flag the
/// binary does not understand, ...).
///
/// # Examples
///
/// ```rust,no_run
/// use binresolve::utils::process::ProcessCommand;
///
/// # fn example() -> binresolve::core::Result<()> {
/// let output = ProcessCommand::new("apt-get")
///     .args(["install", "-y", "wget"])
///     .env("DEBIAN_FRONTEND", "noninteractive")
///     .with_context("wget")
///     .execute()?;
///
/// if !output.success() {
///     eprintln!("{}", output.stderr);
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Output capture**: stdout and stderr are always piped
/// - **Stdin**: closed (installers must never wait for input), inherited by
///   [`execute_raw`](ProcessCommand::execute_raw) and [`status`](ProcessCommand::status)
/// - **Working directory**: current process directory
/// - **Environment**: inherited from the parent process
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    /// Executable name or absolute path
    program: OsString,

    /// Arguments in the order they are passed
    args: Vec<String>,

    /// Working directory for the child process
    current_dir: Option<PathBuf>,

    /// Extra environment variables
    env_vars: Vec<(String, String)>,

    /// Optional context string for log messages (typically the binary name)
    context: Option<String>,

    /// User id the child runs as (Unix only)
    uid: Option<u32>,
}

impl ProcessCommand {
    /// Creates a builder for `program`, which may be a bare name or a path.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().as_os_str().to_os_string(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            context: None,
            uid: None,
        }
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory of the child process.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a context for logging (e.g. the binary being resolved)
    ///
    /// With context, log messages are prefixed with the identifier:
    /// ```text
    /// (wget) Executing command: /usr/bin/apt-get install -y wget
    /// ```
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Run the child as user `uid`; `None` keeps the current user.
    ///
    /// Switching user needs root. Ignored on non-Unix platforms.
    pub fn run_as(mut self, uid: Option<u32>) -> Self {
        self.uid = uid;
        self
    }

    /// Returns the full command line as a single string, for logs and error messages.
    #[must_use]
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "process", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        #[cfg(unix)]
        if let Some(uid) = self.uid {
            use std::os::unix::process::CommandExt;
            tracing::debug!(target: "process", "Running {} as uid {}", self.program.to_string_lossy(), uid);
            cmd.uid(uid);
        }
        cmd
    }

    fn spawn_with(&self, stdin: Stdio) -> Result<(std::process::Output, Timer)> {
        let timer = Timer::start(self);
        let mut cmd = self.command();
        cmd.stdin(stdin).stdout(Stdio::piped()).stderr(Stdio::piped());
        let output = cmd.output().inspect_err(|e| {
            tracing::debug!(target: "process", "{}Failed to spawn {}: {}", timer.prefix, timer.cmdline, e);
        })?;
        Ok((output, timer))
    }

    /// Runs the process to completion and captures its output.
    ///
    /// Stdin is closed and the output is decoded as lossy UTF-8, which suits version
    /// probes and installers. Use [`execute_raw`](Self::execute_raw) when the bytes
    /// matter.
    ///
    /// # Errors
    ///
    /// Returns [`BinError::Io`](crate::core::BinError::Io) when the process cannot be
    /// spawned (missing executable, permission denied). A process that runs and exits
    /// non-zero is reported through [`CommandOutput::code`], not as an error.
    pub fn execute(self) -> Result<CommandOutput> {
        let (output, timer) = self.spawn_with(Stdio::null())?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !result.stdout.trim().is_empty() {
            tracing::trace!(target: "process", "{}{}", timer.prefix, result.stdout.trim());
        }
        if !result.stderr.trim().is_empty() {
            tracing::trace!(target: "process", "{}{}", timer.prefix, result.stderr.trim());
        }
        timer.finish(result.code);
        Ok(result)
    }

    /// Runs the process with the parent's stdin and captures stdout and stderr as
    /// raw bytes.
    ///
    /// # Errors
    ///
    /// As for [`execute`](Self::execute).
    pub fn execute_raw(self) -> Result<RawOutput> {
        let (output, timer) = self.spawn_with(Stdio::inherit())?;
        let result = RawOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        };
        timer.finish(result.code);
        Ok(result)
    }

    /// Runs the process attached to the parent's stdin, stdout and stderr and
    /// returns its exit code (`None` when killed by a signal).
    ///
    /// # Errors
    ///
    /// As for [`execute`](Self::execute).
    pub fn status(self) -> Result<Option<i32>> {
        let timer = Timer::start(&self);
        let status = self.command().status().inspect_err(|e| {
            tracing::debug!(target: "process", "{}Failed to spawn {}: {}", timer.prefix, timer.cmdline, e);
        })?;
        timer.finish(status.code());
        Ok(status.code())
    }
}

/// Start/finish logging shared by the execute variants.
struct Timer {
    start: std::time::Instant,
    cmdline: String,
    prefix: String,
}

impl Timer {
    fn start(command: &ProcessCommand) -> Self {
        let cmdline = command.display();
        let prefix = command.context.as_ref().map(|ctx| format!("({ctx}) ")).unwrap_or_default();
        tracing::debug!(target: "process", "{}Executing command: {}", prefix, cmdline);
        Self {
            start: std::time::Instant::now(),
            cmdline,
            prefix,
        }
    }

    fn finish(self, code: Option<i32>) {
        if code == Some(0) {
            tracing::debug!(target: "process", "{}Command completed successfully", self.prefix);
        } else {
            tracing::debug!(target: "process", "{}Command failed with exit code: {:?}", self.prefix, code);
        }

        let elapsed = self.start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "process::perf",
                "{}{} took {:.2}s",
                self.prefix,
                self.cmdline,
                elapsed.as_secs_f64()
            );
        }
    }
}

/// Byte-exact result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    /// Standard output, unmodified
    pub stdout: Vec<u8>,
    /// Standard error, unmodified
    pub stderr: Vec<u8>,
}

impl RawOutput {
    /// Whether the process exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    /// Standard output (lossy UTF-8)
    pub stdout: String,
    /// Standard error (lossy UTF-8)
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Standard output, or standard error when stdout is blank.
    ///
    /// Many tools (java, older ffmpeg builds) print their version banner on stderr.
    #[must_use]
    pub fn text(&self) -> &str {
        if self.stdout.trim().is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}
