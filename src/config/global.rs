//! User configuration for LPM.
//!
//! LPM works without any configuration file. When one exists it can relocate
//! the install layout, tune network timeouts, control the scheduled update, and
//! describe additional packages and scripts.
//!
//! # Configuration File Location
//!
//! The first of these that applies is used:
//!
//! 1. The `--config <path>` flag
//! 2. The `LPM_CONFIG_PATH` environment variable
//! 3. `~/.lpm/config.toml`
//!
//! A missing file means defaults.
//!
//! # File Format
//!
//! ```toml
//! [layout]
//! bin_dir = "~/bin"
//!
//! [network]
//! connect_timeout_secs = 10
//! read_timeout_secs = 60
//!
//! [scheduler]
//! enabled = true
//! systemctl = "systemctl"
//!
//! [packages.windsurf]
//! api_url = "https://windsurf-stable.codeium.com/api/update/linux-x64/stable/latest"
//!
//! [scripts]
//! base_url = "https://scripts.joshthomas.dev"
//! runner = "uv run --quiet"
//!
//! [scripts.entries]
//! my-tool = "my_tool.py"
//! ```

use crate::config::layout::{Layout, LayoutOverrides};
use crate::config::package::{PackageConfig, PackageSpec};
use crate::constants::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS,
    DEFAULT_SCRIPT_RUNNER, DEFAULT_SCRIPTS_BASE_URL, LPM_CONFIG_DIR,
};
use crate::core::LpmError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Seconds allowed for establishing a connection
    pub connect_timeout_secs: u64,
    /// Seconds allowed between received chunks
    pub read_timeout_secs: u64,
    /// `User-Agent` header; defaults to `lpm/<version>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl NetworkConfig {
    /// Connect timeout as a [`Duration`]
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Read timeout as a [`Duration`]
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Effective `User-Agent` header value
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("lpm/{}", env!("CARGO_PKG_VERSION")))
    }
}

/// Scheduled update (systemd user timer) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Register the timer on install. `--skip-auto-update` overrides this per call.
    pub enabled: bool,
    /// Program used for `--user daemon-reload|enable|start|stop|disable`
    pub systemctl: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            systemctl: "systemctl".to_string(),
        }
    }
}

/// Script wrapper settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptsConfig {
    /// URL that script file names are appended to
    pub base_url: String,
    /// Command that runs a remote script
    pub runner: String,
    /// Additional `command name = "file name"` catalog entries
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub entries: BTreeMap<String, String>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SCRIPTS_BASE_URL.to_string(),
            runner: DEFAULT_SCRIPT_RUNNER.to_string(),
            entries: BTreeMap::new(),
        }
    }
}

/// Root of the LPM configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LpmConfig {
    /// Path overrides
    #[serde(default)]
    pub layout: LayoutOverrides,
    /// HTTP client settings
    #[serde(default)]
    pub network: NetworkConfig,
    /// Scheduled update settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Package tables keyed by package name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub packages: BTreeMap<String, PackageConfig>,
    /// Script wrapper settings
    #[serde(default)]
    pub scripts: ScriptsConfig,
}

impl LpmConfig {
    /// Load from an explicit path, `LPM_CONFIG_PATH`, or the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed. An
    /// explicit path that does not exist is also an error.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(&path).await;
        }

        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(env_path) if !env_path.is_empty() => PathBuf::from(env_path),
            _ => Self::default_path()?,
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `~/.lpm/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(LPM_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Resolved install layout for the current user.
    pub fn layout(&self) -> Result<Layout> {
        Layout::resolve(&self.layout)
    }

    /// Full spec of package `name`.
    ///
    /// # Errors
    ///
    /// [`LpmError::UnknownPackage`] when `name` is neither built in nor configured,
    /// [`LpmError::ConfigError`] when its table is incomplete.
    pub fn package(&self, name: &str) -> Result<PackageSpec, LpmError> {
        match self.packages.get(name) {
            Some(table) => table.resolve(name),
            None if name == PackageSpec::windsurf().name => Ok(PackageSpec::windsurf()),
            None => Err(LpmError::UnknownPackage {
                name: name.to_string(),
                available: self.package_names(),
            }),
        }
    }

    /// Names of all packages that can be managed, sorted.
    #[must_use]
    pub fn package_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.packages.keys().cloned().collect();
        let builtin = PackageSpec::windsurf().name;
        if !names.contains(&builtin) {
            names.push(builtin);
        }
        names.sort();
        names
    }
}
