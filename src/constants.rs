//! Global constants used throughout the LPM codebase.
//!
//! Timeouts, default endpoints, environment variable names and the file names
//! LPM generates. Paths here are relative; the absolute locations come from
//! [`crate::config::Layout`].

use std::time::Duration;

/// Package managed when `--package` is not given.
pub const DEFAULT_PACKAGE: &str = "windsurf";

/// Latest-release endpoint of the built-in windsurf package.
pub const WINDSURF_API_URL: &str =
    "https://windsurf-stable.codeium.com/api/update/linux-x64/stable/latest";

/// Timeout for external commands (5 minutes).
///
/// Applies to `tar`, `git` and `systemctl` unless a command sets its own.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for `systemctl --user` calls (30 seconds).
pub const SYSTEMCTL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default HTTP connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout in seconds.
///
/// This bounds the wait for each chunk, not the whole download.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 120;

/// Environment variable that disables progress indicators.
pub const NO_PROGRESS_ENV: &str = "LPM_NO_PROGRESS";

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "LPM_CONFIG_PATH";

/// Directory under the home directory holding LPM's own configuration.
pub const LPM_CONFIG_DIR: &str = ".lpm";

/// File name of LPM's configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of the generated update command (`update-<package>`).
pub const UPDATE_SCRIPT_PREFIX: &str = "update-";

/// Suffix of the systemd unit names (`<package>-update.service`/`.timer`).
pub const SYSTEMD_UNIT_SUFFIX: &str = "-update";

/// Default location of a bare repository created by `bare-clone`.
pub const DEFAULT_BARE_LOCATION: &str = ".bare";

/// Default base URL that script wrappers fetch from.
pub const DEFAULT_SCRIPTS_BASE_URL: &str = "https://scripts.joshthomas.dev";

/// Default command that runs a fetched script.
pub const DEFAULT_SCRIPT_RUNNER: &str = "uv run --quiet";

/// Version reported when the metadata file lacks the version field.
pub const UNKNOWN_VERSION: &str = "unknown";
