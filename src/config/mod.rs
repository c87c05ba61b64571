//! Configuration for LPM
//!
//! - [`LpmConfig`] is the optional TOML file (`~/.lpm/config.toml`)
//! - [`PackageSpec`] describes a managed package
//! - [`Layout`] holds the resolved filesystem locations
//!
//! # Examples
//!
//! ```rust,no_run
//! use lpm_cli::config::LpmConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = LpmConfig::load_with_optional(None).await?;
//! let layout = config.layout()?;
//! let spec = config.package("windsurf")?;
//! println!("{} installs into {}", spec.display_name, layout.install_dir(&spec).display());
//! # Ok(())
//! # }
//! ```

mod global;
mod layout;
mod package;

pub use global::{LpmConfig, NetworkConfig, SchedulerConfig, ScriptsConfig};
pub use layout::{Layout, LayoutOverrides};
pub use package::{DesktopEntrySpec, DetailField, PackageConfig, PackageSpec, StripRule, UserDirs};
