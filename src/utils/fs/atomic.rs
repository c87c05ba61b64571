//! Atomic write and replace operations using a temp-and-rename strategy.
//!
//! Readers of a path written here see either the old content or the new content,
//! never a partial write. The same idea applies to whole directory trees in
//! [`replace_dir`].

use crate::utils::fs::dirs::{ensure_parent_dir, remove_dir_all};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Safely writes a string to a file using atomic operations.
///
/// # Examples
///
/// ```rust,no_run
/// use lpm_cli::utils::fs::safe_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// safe_write(Path::new("/home/user/.lpm/config.toml"), "[network]\nconnect_timeout_secs = 10\n")?;
/// # Ok(())
/// # }
/// ```
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file.
///
/// 1. Writes content to a hidden `.<name>.tmp` sibling
/// 2. Syncs the temporary file to disk
/// 3. Renames the temporary file over the target path
///
/// Parent directories are created when missing. The temporary file is removed
/// if any step fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    write_then_rename(path, content, false)
}

/// Atomically writes an executable file (mode `0o755` on Unix).
///
/// The mode is set on the temporary file before the rename, so the target is
/// never visible without its executable bit.
pub fn write_executable(path: &Path, content: &str) -> Result<()> {
    write_then_rename(path, content.as_bytes(), true)
}

fn write_then_rename(path: &Path, content: &[u8], executable: bool) -> Result<()> {
    use std::io::Write;

    ensure_parent_dir(path)?;

    let temp_path = temp_sibling(path);

    let result = (|| -> Result<()> {
        {
            let mut file = fs::File::create(&temp_path).with_context(|| {
                format!(
                    "Failed to create temp file: {}\n\nCheck file permissions and that directory exists",
                    temp_path.display()
                )
            })?;

            file.write_all(content)
                .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

            file.sync_all().with_context(|| "Failed to sync file to disk")?;
        }

        if executable {
            crate::utils::fs::dirs::set_executable(&temp_path)?;
        }

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp file to: {}", path.display()))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Replaces `target` with the fully materialized directory `replacement`.
///
/// `replacement` must live on the same file system as `target` (normally a
/// sibling) so the final step is a plain rename. Any existing `target` is
/// removed first; there is no merge and no backup.
///
/// # Errors
///
/// Returns an error if the old tree cannot be removed or the rename fails.
/// `replacement` is left in place for the caller to clean up.
pub fn replace_dir(replacement: &Path, target: &Path) -> Result<()> {
    remove_dir_all(target)
        .with_context(|| format!("Failed to remove previous directory: {}", target.display()))?;

    fs::rename(replacement, target).with_context(|| {
        format!("Failed to move {} into place at {}", replacement.display(), target.display())
    })
}
