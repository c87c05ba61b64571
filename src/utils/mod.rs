//! Utilities and helpers
//!
//! File operations, platform lookups and progress indicators shared by the
//! lifecycle manager and the CLI commands.
//!
//! # Modules
//!
//! - [`fs`] - Atomic writes, tree copies and RAII temporary directories
//! - [`platform`] - Home directory, path expansion and `PATH` lookups
//! - [`progress`] - Progress bars and spinners for downloads
//!
//! # Example
//!
//! ```rust,no_run
//! use lpm_cli::utils::{ensure_dir, atomic_write, ProgressBar};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("/tmp/lpm-demo"))?;
//! atomic_write(Path::new("/tmp/lpm-demo/file.txt"), b"content")?;
//!
//! let progress = ProgressBar::new_spinner();
//! progress.set_message("Working...");
//! progress.finish_and_clear();
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{TempDir, atomic_write, ensure_dir, safe_write};
pub use platform::{get_home_dir, resolve_path};
pub use progress::ProgressBar;
