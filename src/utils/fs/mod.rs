//! File system utilities
//!
//! Atomic writes, tree copies and RAII temporary directories. Everything LPM
//! writes to the user's home directory goes through these helpers, so a failed
//! operation never leaves a half-written launcher or a half-copied install tree.
//!
//! # Examples
//!
//! ```rust,no_run
//! use lpm_cli::utils::fs::{ensure_dir, write_executable, TempDir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("/home/user/.local/bin"))?;
//! write_executable(Path::new("/home/user/.local/bin/tool"), "#!/bin/sh\nexec true\n")?;
//!
//! let staging = TempDir::new("staging")?;
//! println!("staging in {}", staging.path().display());
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod temp;

pub use atomic::{atomic_write, replace_dir, safe_write, write_executable};
pub use dirs::{
    copy_tree, ensure_dir, ensure_parent_dir, remove_dir_all, remove_file_if_exists,
    set_executable,
};
pub use temp::TempDir;
