//! Platform helpers: home directory, path expansion and `PATH` lookups
//!
//! LPM manages per-user installs, so everything is resolved relative to the
//! user's home directory. Paths from configuration may use `~` and environment
//! variables; [`resolve_path`] expands both.
//!
//! # Examples
//!
//! ```rust,no_run
//! use lpm_cli::utils::platform::{get_home_dir, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let home = get_home_dir()?;
//! let bin = resolve_path("~/.local/bin")?;
//! assert_eq!(bin, home.join(".local/bin"));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the home directory path for the current user.
///
/// # Errors
///
/// Fails when `HOME` is unset and no fallback is available.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine home directory.\n\nCheck that the HOME environment variable is set"
        )
    })
}

/// Expands `~` and environment variables in a path.
///
/// # Supported Patterns
///
/// - `~/path` expands to `{home}/path`
/// - `$VAR/path` and `${VAR}/path` expand environment variables
///
/// # Errors
///
/// Fails on undefined environment variables or an undeterminable home directory.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(path).with_context(|| format!("Failed to expand path: {path}"))?;

    Ok(PathBuf::from(expanded.as_ref()))
}

/// Checks if a command is available in the system `PATH`.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Returns `true` when `dir` is one of the entries of the `PATH` variable.
///
/// Comparison is on the literal path components; no canonicalization.
#[must_use]
pub fn dir_on_path(dir: &Path) -> bool {
    std::env::var_os("PATH").is_some_and(|paths| path_list_contains(&paths, dir))
}

fn path_list_contains(paths: &std::ffi::OsStr, dir: &Path) -> bool {
    std::env::split_paths(paths).any(|entry| entry == dir)
}

/// Absolute path of the running `lpm` binary.
///
/// Generated scripts exec this path so they keep working when `lpm` itself is
/// not on `PATH`.
pub fn current_exe_path() -> Result<PathBuf> {
    std::env::current_exe().context("Failed to determine the path of the lpm executable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_home_dir() {
        let home = get_home_dir().unwrap();
        assert!(home.is_absolute());
    }

    #[test]
    fn test_resolve_path_tilde() {
        let home = get_home_dir().unwrap();
        let resolved = resolve_path("~/.local/share").unwrap();
        assert_eq!(resolved, home.join(".local/share"));
    }

    #[test]
    fn test_resolve_path_plain() {
        assert_eq!(resolve_path("/opt/tools").unwrap(), PathBuf::from("/opt/tools"));
        assert_eq!(resolve_path("relative/dir").unwrap(), PathBuf::from("relative/dir"));
    }

    #[test]
    fn test_resolve_path_undefined_var() {
        assert!(resolve_path("$LPM_SURELY_UNDEFINED_VARIABLE_42/x").is_err());
    }

    #[test]
    fn test_path_list_contains() {
        let paths = std::env::join_paths(["/usr/bin", "/home/u/.local/bin"]).unwrap();
        assert!(path_list_contains(&paths, Path::new("/home/u/.local/bin")));
        assert!(!path_list_contains(&paths, Path::new("/home/u/bin")));
    }

    #[test]
    #[cfg(unix)]
    fn test_command_exists() {
        assert!(command_exists("sh"));
        assert!(!command_exists("lpm-definitely-not-a-command"));
    }
}
