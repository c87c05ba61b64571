//! Archive extraction and install-directory replacement
//!
//! Installation happens in three stages, each in its own staging directory:
//!
//! 1. `tar -xzf` into `extract/` inside a temporary staging area
//! 2. the extraction root (see [`StripRule`]) is copied into a hidden sibling
//!    of the target directory
//! 3. the live directory is removed and the sibling renamed into place
//!
//! Because the new tree is complete before the old one is touched, the install
//! directory is either absent or holds one consistent release. Both staging
//! areas are [`TempDir`]s and vanish on every exit path.

use crate::config::StripRule;
use crate::core::LpmError;
use crate::process::ProcessCommand;
use crate::utils::fs::{TempDir, copy_tree, ensure_dir, replace_dir};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Installs `.tar.gz` archives into a target directory.
#[derive(Debug, Clone, Default)]
pub struct ArchiveInstaller {
    strip_rule: StripRule,
}

impl ArchiveInstaller {
    /// Creates an installer applying `strip_rule` to extracted archives.
    #[must_use]
    pub fn new(strip_rule: StripRule) -> Self {
        Self {
            strip_rule,
        }
    }

    /// Extracts `archive` and makes its contents the new `target_dir`.
    ///
    /// Any previous contents of `target_dir` are discarded; files that existed
    /// only in the old release do not survive.
    ///
    /// # Errors
    ///
    /// - [`LpmError::ExtractionError`] when `tar` fails (carries its error output)
    ///   or the archive is empty
    /// - [`LpmError::CommandNotFound`] when `tar` is not installed
    /// - [`LpmError::FileSystemError`] when copying, removing or renaming fails
    pub async fn install(&self, archive: &Path, target_dir: &Path) -> Result<()> {
        let staging = TempDir::new("extract")?;
        let extract_dir = staging.path().join("extract");
        ensure_dir(&extract_dir)?;

        ProcessCommand::tar_extract(archive, &extract_dir)
            .with_context("Extracting archive")
            .execute_success()
            .await
            .map_err(|e| extraction_error(archive, e))?;

        let root = extraction_root(&extract_dir, &self.strip_rule)?;
        tracing::debug!(target: "lifecycle", "Extraction root: {}", root.display());

        let parent = target_dir.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        ensure_dir(parent)?;

        let stem = target_dir
            .file_name()
            .map_or_else(|| "install".to_string(), |n| n.to_string_lossy().into_owned());
        let sibling = TempDir::new_in(parent, &format!("{stem}_new"))?;
        let tree = sibling.path().join("tree");

        copy_tree(&root, &tree).map_err(|e| filesystem_error("copy", &tree, &e))?;
        replace_dir(&tree, target_dir).map_err(|e| filesystem_error("replace", target_dir, &e))?;

        tracing::info!(target: "lifecycle", "Installed archive into {}", target_dir.display());
        Ok(())
    }
}

/// Directory whose contents become the install directory.
///
/// When `extract_dir` holds exactly one entry and that entry is a real
/// directory (not a symlink to one), the rule decides whether it is stripped.
/// Anything else installs `extract_dir` as it is.
pub(crate) fn extraction_root(extract_dir: &Path, rule: &StripRule) -> Result<PathBuf> {
    let mut children = Vec::new();
    for entry in std::fs::read_dir(extract_dir).map_err(|e| LpmError::FileSystemError {
        operation: "read".to_string(),
        path: extract_dir.display().to_string(),
        reason: e.to_string(),
    })? {
        children.push(entry?.path());
    }

    if children.is_empty() {
        return Err(LpmError::ExtractionError {
            archive: extract_dir.display().to_string(),
            reason: "archive contains no files".to_string(),
        }
        .into());
    }

    if let [only] = children.as_slice()
        && std::fs::symlink_metadata(only).is_ok_and(|m| m.is_dir())
    {
        let strip = match rule {
            StripRule::SingleDirectory => true,
            StripRule::Never => false,
            StripRule::Named(name) => only.file_name().is_some_and(|n| n == name.as_str()),
        };
        if strip {
            return Ok(only.clone());
        }
    }

    Ok(extract_dir.to_path_buf())
}

fn extraction_error(archive: &Path, error: anyhow::Error) -> anyhow::Error {
    let reason = match error.downcast_ref::<LpmError>() {
        Some(LpmError::CommandFailed {
            stderr,
            ..
        }) => stderr.trim().to_string(),
        Some(LpmError::CommandTimeout {
            seconds,
            ..
        }) => format!("tar did not finish within {seconds} seconds"),
        _ => return error,
    };
    LpmError::ExtractionError {
        archive: archive.display().to_string(),
        reason,
    }
    .into()
}

fn filesystem_error(operation: &str, path: &Path, error: &anyhow::Error) -> LpmError {
    LpmError::FileSystemError {
        operation: operation.to_string(),
        path: path.display().to_string(),
        reason: format!("{error:#}"),
    }
}
