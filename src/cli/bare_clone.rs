//! Clone a repository bare for worktree-based work.
//!
//! ```bash
//! mkdir project && cd project
//! lpm bare-clone git@github.com:owner/repo.git
//! git worktree add main
//! ```

use crate::constants::DEFAULT_BARE_LOCATION;
use crate::git::bare_clone;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Command to create a bare clone.
#[derive(Args, Debug)]
pub struct BareCloneCommand {
    /// Repository URL or path
    pub(crate) repository: String,

    /// Where to put the bare repository
    #[arg(short, long, default_value = DEFAULT_BARE_LOCATION)]
    pub(crate) location: PathBuf,
}

impl BareCloneCommand {
    pub(crate) async fn execute(self) -> Result<()> {
        let clone = bare_clone(&self.repository, &self.location).await?;
        println!(
            "{}",
            format!("Cloned {} into {}", self.repository, clone.bare_dir.display()).green()
        );
        println!("  {} points at it; add worktrees with `git worktree add <branch>`", clone.gitdir_file.display());
        Ok(())
    }
}
