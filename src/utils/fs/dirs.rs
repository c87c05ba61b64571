//! Directory operations for creating, copying, and removing directories.
//!
//! The copy here is a full tree copy: regular files keep their permission bits
//! and symbolic links are recreated as links, because installed archives carry
//! executables and relative links that must survive materialization.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or if creation fails.
///
/// # Examples
///
/// ```rust,no_run
/// use lpm_cli::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("/home/user/.local/bin"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            format!(
                "Failed to create directory: {}\n\nCheck directory permissions and path validity",
                path.display()
            )
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensures that the parent directory of a file path exists.
///
/// Paths without a parent are accepted as-is.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Recursively copies a directory tree to a new location.
///
/// # Behavior
///
/// - Creates the destination directory if it doesn't exist
/// - Copies regular files, preserving permission bits (`fs::copy` carries them)
/// - Recreates symbolic links with the same target instead of following them
/// - Skips sockets, FIFOs and device nodes
///
/// Each directory keeps the mode of its source once its contents are copied, so
/// read-only source directories do not block the copy itself.
///
/// # Examples
///
/// ```rust,no_run
/// use lpm_cli::utils::fs::copy_tree;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// copy_tree(Path::new("/tmp/staging/Windsurf"), Path::new("/home/user/.local/share/.windsurf.new"))?;
/// # Ok(())
/// # }
/// ```
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_tree(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!("Failed to copy file from {} to {}", src_path.display(), dst_path.display())
            })?;
        } else if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
        }
    }

    let permissions = fs::metadata(src)
        .with_context(|| format!("Failed to read metadata: {}", src.display()))?
        .permissions();
    fs::set_permissions(dst, permissions)
        .with_context(|| format!("Failed to set permissions on {}", dst.display()))?;

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target =
        fs::read_link(src).with_context(|| format!("Failed to read link: {}", src.display()))?;
    std::os::unix::fs::symlink(&target, dst).with_context(|| {
        format!("Failed to create link {} -> {}", dst.display(), target.display())
    })
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    // No portable symlink creation; copy what the link points at
    fs::copy(src, dst).with_context(|| {
        format!("Failed to copy file from {} to {}", src.display(), dst.display())
    })?;
    Ok(())
}

/// Recursively removes a directory and all its contents.
///
/// A missing directory is not an error. A symbolic link is removed as a link;
/// its target is left alone.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::remove_file(path)
            .with_context(|| format!("Failed to remove link: {}", path.display())),
        Ok(_) => fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read metadata: {}", path.display()))
        }
    }
}

/// Removes a file or link if it exists.
///
/// Returns `true` when something was removed and `false` when the path was
/// already absent.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
    }
}

/// Marks a file as executable (`0o755`).
#[cfg(unix)]
pub fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to make {} executable", path.display()))
}

/// Marks a file as executable. No-op where the platform has no executable bit.
#[cfg(not(unix))]
pub fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
