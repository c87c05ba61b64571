//! Bare clones laid out for worktree-only work
//!
//! [`bare_clone`] clones a repository as a bare repository inside a project
//! directory and points `<project>/.git` at it, so `git worktree add` can be run
//! straight from the project directory:
//!
//! ```text
//! project/
//! ├── .bare/        # git clone --bare
//! ├── .git          # "gitdir: ./.bare"
//! ├── main/         # git worktree add main
//! └── feature-x/    # git worktree add feature-x
//! ```
//!
//! A plain `git clone --bare` only maps the remote's branches onto local
//! branches, so the fetch refspec is reset to track `refs/remotes/origin/*`
//! like a normal clone does.

use crate::core::LpmError;
use crate::process::ProcessCommand;
use crate::utils::fs::safe_write;
use crate::utils::platform::command_exists;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Fetch refspec of a regular clone.
pub const ORIGIN_FETCH_REFSPEC: &str = "+refs/heads/*:refs/remotes/origin/*";

/// Paths created by [`bare_clone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BareClone {
    /// The bare repository
    pub bare_dir: PathBuf,
    /// `.git` file next to it
    pub gitdir_file: PathBuf,
}

/// Clones `repository` bare into `location` and writes the `.git` pointer file
/// into the parent of `location`.
///
/// # Errors
///
/// - [`LpmError::ConfigError`] when `location` has no final component
/// - [`LpmError::FileSystemError`] when the parent already holds a `.git`
///   entry; nothing is cloned in that case
/// - [`LpmError::CommandFailed`] with git's error output when a git step fails
/// - [`LpmError::CommandNotFound`] when git is not installed
pub async fn bare_clone(repository: &str, location: &Path) -> Result<BareClone> {
    let name = location.file_name().ok_or_else(|| LpmError::ConfigError {
        message: format!("'{}' does not name a directory", location.display()),
    })?;
    let parent = location.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let gitdir_file = parent.join(".git");

    if gitdir_file.symlink_metadata().is_ok() {
        return Err(LpmError::FileSystemError {
            operation: "bare-clone".to_string(),
            path: gitdir_file.display().to_string(),
            reason: "a .git entry already exists".to_string(),
        }
        .into());
    }

    if !command_exists("git") {
        return Err(LpmError::CommandNotFound {
            program: "git".to_string(),
        }
        .into());
    }

    let location_arg = location.display().to_string();
    tracing::info!(target: "git", "Cloning bare repository {} to {}", repository, location_arg);
    ProcessCommand::git(["clone", "--bare", repository, location_arg.as_str()])
        .with_context("Cloning bare repository")
        .execute_success()
        .await?;

    tracing::debug!(target: "git", "Setting remote.origin.fetch to {}", ORIGIN_FETCH_REFSPEC);
    ProcessCommand::git(["config", "remote.origin.fetch", ORIGIN_FETCH_REFSPEC])
        .current_dir(location)
        .with_context("Adjusting origin fetch locations")
        .execute_success()
        .await?;

    safe_write(&gitdir_file, &format!("gitdir: ./{}\n", name.to_string_lossy()))?;

    Ok(BareClone {
        bare_dir: location.to_path_buf(),
        gitdir_file,
    })
}
