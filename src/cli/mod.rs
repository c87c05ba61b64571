//! Command-line interface for LPM
//!
//! ```bash
//! # Install the default package (windsurf)
//! lpm install
//!
//! # Install another configured package without the update timer
//! lpm --package tool install --skip-auto-update
//!
//! # Update, inspect and remove
//! lpm update
//! lpm version
//! lpm uninstall --keep-config
//!
//! # Helpers
//! lpm bare-clone git@github.com:owner/repo.git
//! lpm scripts install git-bare-clone
//! ```
//!
//! Global flags (`--verbose`, `--quiet`, `--no-progress`, `--config`,
//! `--package`) work before or after the subcommand.

mod bare_clone;
mod install;
mod scripts;
mod uninstall;
mod update;
mod version;

#[cfg(test)]
mod tests;

use crate::config::LpmConfig;
use crate::constants::{CONFIG_PATH_ENV, DEFAULT_PACKAGE, NO_PROGRESS_ENV};
use crate::lifecycle::{Advisory, LifecycleManager, UpdateCommand};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can build one directly.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: Option<String>,
    /// Disable progress bars and spinners
    pub no_progress: bool,
}

impl CliConfig {
    /// Exports `LPM_NO_PROGRESS=1` when progress is disabled.
    ///
    /// # Safety
    ///
    /// Modifies the process environment. Call it while the process is still
    /// single-threaded, before the async runtime is built.
    pub unsafe fn apply_to_env(&self) {
        if self.no_progress {
            // SAFETY: the caller guarantees no other thread exists yet.
            unsafe { std::env::set_var(NO_PROGRESS_ENV, "1") };
        }
    }

    /// Installs the global `tracing` subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over [`CliConfig::log_level`].
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("info"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

/// Local package manager for archive-distributed applications.
#[derive(Parser, Debug)]
#[command(
    name = "lpm",
    about = "Install, update and remove archive-distributed applications",
    version,
    long_about = "LPM installs applications shipped as .tar.gz archives into your home directory, \
                  keeps them up to date through a systemd user timer, and provides a few helpers \
                  for git bare clones and script wrappers."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable progress bars and spinners
    #[arg(long, global = true)]
    no_progress: bool,

    /// Config file (default: ~/.lpm/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Package to operate on
    #[arg(short, long, global = true, default_value = DEFAULT_PACKAGE, value_name = "NAME")]
    package: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install the latest release of the package
    Install(install::InstallCommand),

    /// Update the package to the latest release
    Update(update::UpdateCommand),

    /// Remove the package and everything install created
    Uninstall(uninstall::UninstallCommand),

    /// Show the installed version
    Version(version::VersionCommand),

    /// Clone a repository bare for worktree-based work
    BareClone(bare_clone::BareCloneCommand),

    /// Manage script wrappers
    #[command(subcommand)]
    Scripts(scripts::ScriptsCommand),
}

/// What a lifecycle command needs besides its own flags.
pub(crate) struct Session {
    pub config: LpmConfig,
    pub package: String,
    pub config_path: Option<PathBuf>,
}

impl Session {
    /// Loads the config file; `explicit` is the `--config` flag.
    async fn load(package: String, explicit: Option<PathBuf>) -> Result<Self> {
        let config = LpmConfig::load_with_optional(explicit.clone()).await?;
        let config_path = explicit.or_else(|| {
            std::env::var_os(CONFIG_PATH_ENV)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .filter(|p| p.exists())
        });
        Ok(Self {
            config,
            package,
            config_path,
        })
    }

    /// Manager for the selected package.
    ///
    /// The generated update command re-runs this executable with the same
    /// config file.
    pub fn manager(&self) -> Result<LifecycleManager> {
        let config_path = match &self.config_path {
            Some(path) => Some(std::path::absolute(path).with_context(|| {
                format!("Failed to resolve config path {}", path.display())
            })?),
            None => None,
        };
        Ok(LifecycleManager::from_config(&self.config, &self.package)?
            .with_update_command(UpdateCommand::current(config_path)?))
    }
}

impl Cli {
    /// [`CliConfig`] for the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            no_progress: self.no_progress,
        }
    }

    /// Runs the command with explicit runtime settings.
    ///
    /// [`CliConfig::apply_to_env`] is expected to have run already.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::BareClone(cmd) => cmd.execute().await,
            Commands::Install(cmd) => cmd.execute(&Session::load(self.package, self.config).await?).await,
            Commands::Update(cmd) => cmd.execute(&Session::load(self.package, self.config).await?).await,
            Commands::Uninstall(cmd) => {
                cmd.execute(&Session::load(self.package, self.config).await?).await
            }
            Commands::Version(cmd) => cmd.execute(&Session::load(self.package, self.config).await?).await,
            Commands::Scripts(cmd) => cmd.execute(&Session::load(self.package, self.config).await?).await,
        }
    }
}

/// Prints advisories as warnings on stderr.
fn print_advisories(advisories: &[Advisory]) {
    for advisory in advisories {
        eprintln!("{}: {}", "warning".yellow().bold(), advisory);
    }
}
