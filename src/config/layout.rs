//! Filesystem layout of a per-user install
//!
//! Every path LPM writes to is derived from a [`Layout`]. The defaults follow
//! the XDG conventions relative to the home directory:
//!
//! | Path | Default |
//! |------|---------|
//! | install root | `~/.local/share` |
//! | bin directory | `~/.local/bin` |
//! | desktop entries | `~/.local/share/applications` |
//! | systemd user units | `~/.config/systemd/user` |
//! | config home | `~/.config` |
//! | cache home | `~/.cache` |
//!
//! Each can be overridden in the `[layout]` table of the config file.

use crate::config::package::PackageSpec;
use crate::constants::{SYSTEMD_UNIT_SUFFIX, UPDATE_SCRIPT_PREFIX};
use crate::utils::platform::{get_home_dir, resolve_path};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional path overrides from the `[layout]` table.
///
/// Values may use `~` and environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutOverrides {
    /// Directory holding package install directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_root: Option<String>,
    /// Directory for launchers, update commands and script wrappers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<String>,
    /// Directory for `.desktop` files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications_dir: Option<String>,
    /// Directory for systemd user units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systemd_user_dir: Option<String>,
    /// Base directory of per-package configuration directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_home: Option<String>,
    /// Base directory of per-package cache directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_home: Option<String>,
}

/// Resolved absolute locations used by the lifecycle manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory holding package install directories
    pub install_root: PathBuf,
    /// Directory for launchers and generated commands
    pub bin_dir: PathBuf,
    /// Directory for `.desktop` files
    pub applications_dir: PathBuf,
    /// Directory for systemd user units
    pub systemd_user_dir: PathBuf,
    /// Base of per-package configuration directories
    pub config_home: PathBuf,
    /// Base of per-package cache directories
    pub cache_home: PathBuf,
}

impl Layout {
    /// Default layout rooted at `home`.
    #[must_use]
    pub fn from_home(home: &Path) -> Self {
        let data = home.join(".local").join("share");
        let config_home = home.join(".config");
        Self {
            install_root: data.clone(),
            bin_dir: home.join(".local").join("bin"),
            applications_dir: data.join("applications"),
            systemd_user_dir: config_home.join("systemd").join("user"),
            config_home,
            cache_home: home.join(".cache"),
        }
    }

    /// Layout for the current user with `overrides` applied.
    pub fn resolve(overrides: &LayoutOverrides) -> Result<Self> {
        let home = get_home_dir()?;
        Self::from_home(&home).with_overrides(overrides)
    }

    /// Replaces every location that `overrides` sets.
    pub fn with_overrides(mut self, overrides: &LayoutOverrides) -> Result<Self> {
        let slots: [(&Option<String>, &mut PathBuf); 6] = [
            (&overrides.install_root, &mut self.install_root),
            (&overrides.bin_dir, &mut self.bin_dir),
            (&overrides.applications_dir, &mut self.applications_dir),
            (&overrides.systemd_user_dir, &mut self.systemd_user_dir),
            (&overrides.config_home, &mut self.config_home),
            (&overrides.cache_home, &mut self.cache_home),
        ];
        for (value, slot) in slots {
            if let Some(raw) = value {
                *slot = resolve_path(raw)?;
            }
        }
        Ok(self)
    }

    /// `<install_root>/<package>`
    #[must_use]
    pub fn install_dir(&self, spec: &PackageSpec) -> PathBuf {
        self.install_root.join(&spec.name)
    }

    /// `<bin_dir>/<launcher name>`
    #[must_use]
    pub fn launcher_path(&self, spec: &PackageSpec) -> PathBuf {
        self.bin_dir.join(spec.launcher_name())
    }

    /// `<bin_dir>/update-<package>`
    #[must_use]
    pub fn update_script_path(&self, spec: &PackageSpec) -> PathBuf {
        self.bin_dir.join(format!("{UPDATE_SCRIPT_PREFIX}{}", spec.name))
    }

    /// `<applications_dir>/<package>.desktop`
    #[must_use]
    pub fn desktop_entry_path(&self, spec: &PackageSpec) -> PathBuf {
        self.applications_dir.join(format!("{}.desktop", spec.name))
    }

    /// Unit name stem, `<package>-update`
    #[must_use]
    pub fn unit_stem(spec: &PackageSpec) -> String {
        format!("{}{SYSTEMD_UNIT_SUFFIX}", spec.name)
    }

    /// `<systemd_user_dir>/<package>-update.service`
    #[must_use]
    pub fn service_path(&self, spec: &PackageSpec) -> PathBuf {
        self.systemd_user_dir.join(format!("{}.service", Self::unit_stem(spec)))
    }

    /// `<systemd_user_dir>/<package>-update.timer`
    #[must_use]
    pub fn timer_path(&self, spec: &PackageSpec) -> PathBuf {
        self.systemd_user_dir.join(format!("{}.timer", Self::unit_stem(spec)))
    }

    /// Per-user configuration and cache directories of a package.
    ///
    /// Entries that are empty or try to leave their base directory are skipped.
    #[must_use]
    pub fn user_data_dirs(&self, spec: &PackageSpec) -> Vec<PathBuf> {
        let config = spec.user_dirs.config.iter().map(|d| (&self.config_home, d));
        let cache = spec.user_dirs.cache.iter().map(|d| (&self.cache_home, d));
        config
            .chain(cache)
            .filter(|(_, name)| is_plain_relative(name))
            .map(|(base, name)| base.join(name))
            .collect()
    }
}

fn is_plain_relative(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty()
        && path.components().all(|c| matches!(c, std::path::Component::Normal(_)))
}
