//! Temporary directory management with RAII cleanup.
//!
//! Staging areas for downloads and extraction are [`TempDir`]s: whatever the
//! outcome of an operation, dropping the guard removes the directory and
//! everything in it.

use crate::utils::fs::dirs::{ensure_dir, remove_dir_all};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A temporary directory that automatically cleans up when dropped.
///
/// The directory is created when the struct is created and removed recursively
/// when it is dropped, including during unwinding. Cleanup errors are ignored.
///
/// # Examples
///
/// ```rust,no_run
/// use lpm_cli::utils::fs::TempDir;
///
/// # fn example() -> anyhow::Result<()> {
/// {
///     let staging = TempDir::new("staging")?;
///     std::fs::write(staging.path().join("archive.tar.gz"), b"...")?;
/// } // Directory and archive are gone here
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Creates `lpm_{prefix}_{uuid}` in the system temporary directory.
    pub fn new(prefix: &str) -> Result<Self> {
        Self::new_in(&std::env::temp_dir(), prefix)
    }

    /// Creates a hidden `.lpm_{prefix}_{uuid}` directory inside `parent`.
    ///
    /// Use this when the contents will later be renamed somewhere under
    /// `parent`, since a rename cannot cross file systems.
    pub fn new_in(parent: &Path, prefix: &str) -> Result<Self> {
        let hidden = if parent == std::env::temp_dir() {
            ""
        } else {
            "."
        };
        let unique_name = format!("{hidden}lpm_{}_{}", prefix, uuid::Uuid::new_v4());
        let path = parent.join(unique_name);

        ensure_dir(&path)?;

        Ok(Self {
            path,
        })
    }

    /// Returns the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = remove_dir_all(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir() {
        let temp_dir = TempDir::new("test").unwrap();
        let path = temp_dir.path().to_path_buf();

        assert!(path.is_dir());
        std::fs::write(path.join("test.txt"), "test").unwrap();

        drop(temp_dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_dir_new_in_parent() {
        let parent = tempfile::tempdir().unwrap();
        let staged = TempDir::new_in(parent.path(), "install").unwrap();

        assert_eq!(staged.path().parent().unwrap(), parent.path());
        let name = staged.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".lpm_install_"));

        let path = staged.path().to_path_buf();
        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_dir_unique_names() {
        let temp1 = TempDir::new("prefix").unwrap();
        let temp2 = TempDir::new("prefix").unwrap();
        assert_ne!(temp1.path(), temp2.path());
    }
}
