//! LPM - Local Package Manager
//!
//! Installs applications that are distributed as `.tar.gz` archives into the
//! user's home directory and keeps them current, without root and without a
//! system package manager.
//!
//! # Architecture Overview
//!
//! A package is described by a [`config::PackageSpec`]: the endpoint that
//! announces its latest release, the metadata file that records the installed
//! version, and the launcher and desktop entry to create. The lifecycle of a
//! package is driven by [`lifecycle::LifecycleManager`]:
//!
//! - **install** fetches the latest archive, extracts it into
//!   `~/.local/share/<package>`, and writes a launcher, a desktop entry, an
//!   update command and a weekly systemd user timer
//! - **update** replaces the install when the announced version differs from
//!   the installed one
//! - **uninstall** removes the install and everything install created
//! - **version** reports the installed version from the metadata file
//!
//! The install directory is only ever replaced by a fully extracted tree, so
//! a failed download or extraction leaves the previous install in place.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Configuration file, install layout and package specs
//! - [`core`] - Error types and user-facing error formatting
//! - [`lifecycle`] - Version source, archive fetcher, archive installer and the
//!   lifecycle operations
//! - [`git`] - Bare clones for worktree-based work
//! - [`scripts`] - Wrappers for remotely hosted scripts
//! - [`process`] - External command execution with timeouts
//! - [`utils`] - File system, platform and progress helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use lpm_cli::config::LpmConfig;
//! use lpm_cli::lifecycle::LifecycleManager;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = LpmConfig::load_with_optional(None).await?;
//! let manager = LifecycleManager::from_config(&config, "windsurf")?;
//! let report = manager.install(false, false).await?;
//! println!("Installed {} {}", report.package, report.version);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod git;
pub mod lifecycle;
pub mod process;
pub mod scripts;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
