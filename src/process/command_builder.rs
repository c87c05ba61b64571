//! Builder for running external commands with consistent error handling
//!
//! LPM shells out to `tar`, `git` and `systemctl`. All of them go through
//! [`ProcessCommand`], which applies a timeout, captures output and maps every
//! failure onto an [`LpmError`] variant.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::{DEFAULT_COMMAND_TIMEOUT, SYSTEMCTL_TIMEOUT};
use crate::core::LpmError;

/// Fluent builder for an external command.
///
/// # Examples
///
/// ```rust,no_run
/// use lpm_cli::process::ProcessCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = ProcessCommand::new("git")
///     .args(["rev-parse", "--is-bare-repository"])
///     .current_dir("/home/user/project/.bare")
///     .with_context("Checking repository")
///     .execute()
///     .await?;
/// println!("{}", output.stdout.trim());
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Timeout**: 5 minutes, the child is killed when it elapses
/// - **Output capture**: Enabled
/// - **Working directory**: Current process directory
/// - **Environment**: Inherits from parent process
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    /// Program to run, looked up in `PATH` when not a path
    program: String,

    /// Command arguments
    args: Vec<String>,

    /// Working directory for command execution
    current_dir: Option<PathBuf>,

    /// Environment variables to set for the process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log lines
    context: Option<String>,
}

impl ProcessCommand {
    /// Creates a builder for `program` with default settings.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: Some(DEFAULT_COMMAND_TIMEOUT),
            context: None,
        }
    }

    /// Set the working directory for the command
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Add a single argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the process
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a custom timeout for the command (None for no timeout)
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Attach a context string that prefixes log lines for this command
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Command line as a single string, for log and error messages.
    #[must_use]
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn operation(&self) -> String {
        self.args
            .iter()
            .find(|arg| !arg.starts_with('-'))
            .or_else(|| self.args.first())
            .cloned()
            .unwrap_or_default()
    }

    /// Execute the command and return its output.
    ///
    /// # Errors
    ///
    /// - [`LpmError::CommandNotFound`] when the program cannot be spawned because it does not exist
    /// - [`LpmError::CommandTimeout`] when the timeout elapses (the child is killed)
    /// - [`LpmError::CommandFailed`] on a non-zero exit status, carrying the error output
    pub async fn execute(self) -> Result<ProcessOutput> {
        let start = std::time::Instant::now();
        let command_line = self.display();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        match self.context {
            Some(ref ctx) => {
                tracing::debug!(target: "process", "({}) Executing command: {}", ctx, command_line)
            }
            None => tracing::debug!(target: "process", "Executing command: {}", command_line),
        }

        for (key, value) in &self.env_vars {
            tracing::trace!(target: "process", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LpmError::CommandNotFound {
                    program: self.program.clone(),
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to execute {command_line}"));
            }
        };

        let output_future = child.wait_with_output();

        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to execute {command_line}"))?
            } else {
                tracing::warn!(
                    target: "process",
                    "Command timed out after {} seconds: {}",
                    duration.as_secs(),
                    command_line
                );
                return Err(LpmError::CommandTimeout {
                    program: self.program.clone(),
                    operation: self.operation(),
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            output_future.await.with_context(|| format!("Failed to execute {command_line}"))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "process",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "process", "Error: {}", stderr.trim());
            }

            return Err(LpmError::CommandFailed {
                program: self.program.clone(),
                operation: self.operation(),
                stderr: if stderr.trim().is_empty() {
                    stdout
                } else {
                    stderr
                },
            }
            .into());
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "process", "{}", stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "process", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 {
            tracing::debug!(
                target: "process::perf",
                "{} {} took {}ms",
                self.program,
                self.operation(),
                elapsed.as_millis()
            );
        }

        Ok(ProcessOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the command and return only stdout as a trimmed string
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command and check for success
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Output from an external command
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error output
    pub stderr: String,
}

// Convenience builders for the commands LPM runs

impl ProcessCommand {
    /// `tar -xzf <archive> -C <destination>`
    pub fn tar_extract(archive: impl AsRef<Path>, destination: impl AsRef<Path>) -> Self {
        Self::new("tar").args([
            "-xzf".to_string(),
            archive.as_ref().display().to_string(),
            "-C".to_string(),
            destination.as_ref().display().to_string(),
        ])
    }

    /// `<systemctl> --user <args...>` with the shorter systemctl timeout
    ///
    /// `program` is normally `systemctl`; configuration may point it elsewhere.
    pub fn systemctl_user<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program).arg("--user").args(args).with_timeout(Some(SYSTEMCTL_TIMEOUT))
    }

    /// `git <args...>`, never prompting for credentials on the terminal
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git").args(args).env("GIT_TERMINAL_PROMPT", "0")
    }
}
