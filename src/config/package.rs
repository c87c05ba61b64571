//! Package specifications
//!
//! A [`PackageSpec`] describes one archive-distributed package: where its
//! latest version is announced, how to read the installed version back, what to
//! call the launcher and how the desktop entry looks. `windsurf` is built in;
//! `[packages.<name>]` tables in the config file override it or add new packages.
//!
//! ```toml
//! [packages.windsurf]
//! api_url = "https://mirror.example.com/windsurf/latest"
//!
//! [packages.tool]
//! api_url = "https://example.com/tool/latest"
//! version_field = "version"
//! metadata_path = "VERSION.json"
//! strip_root = "never"
//! ```

use crate::constants::WINDSURF_API_URL;
use crate::core::LpmError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Rule deciding which directory of an extracted archive becomes the install root.
///
/// Serialized as `"single-directory"`, `"never"` or `{ named = "Dir" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StripRule {
    /// Strip when the archive contains exactly one entry and it is a directory.
    #[default]
    SingleDirectory,
    /// Always install the archive contents as they are.
    Never,
    /// Strip only when the single directory has this name.
    Named(String),
}

/// A labelled field read from the installed metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailField {
    /// Label shown to the user (e.g., "Codeium")
    pub label: String,
    /// JSON key in the metadata file (e.g., "codeiumVersion")
    pub field: String,
}

impl DetailField {
    fn new(label: &str, field: &str) -> Self {
        Self {
            label: label.to_string(),
            field: field.to_string(),
        }
    }
}

/// Fields of the generated `.desktop` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopEntrySpec {
    /// `Comment=`
    pub comment: String,
    /// `GenericName=`
    pub generic_name: String,
    /// `Categories=`
    pub categories: Vec<String>,
    /// `MimeType=`
    pub mime_types: Vec<String>,
    /// `Keywords=`
    pub keywords: Vec<String>,
    /// `StartupWMClass=`
    pub wm_class: String,
}

/// Per-user directories owned by the package, removed by a full uninstall.
///
/// Names are relative to the config home (`~/.config`) and the cache home
/// (`~/.cache`) respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserDirs {
    /// Directories under the config home
    #[serde(default)]
    pub config: Vec<String>,
    /// Directories under the cache home
    #[serde(default)]
    pub cache: Vec<String>,
}

/// Fully resolved description of a managed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Package name; also the install directory and unit name stem
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Endpoint returning the latest version descriptor as JSON
    pub api_url: String,
    /// JSON key holding the version string, in both the endpoint and the metadata file
    pub version_field: String,
    /// JSON key holding the archive download URL
    pub url_field: String,
    /// Metadata file, relative to the install directory
    pub metadata_path: String,
    /// Executable the launcher runs, relative to the install directory
    pub binary: String,
    /// Icon for the desktop entry, relative to the install directory
    pub icon_path: String,
    /// Extra labelled fields shown by `version`
    pub detail_fields: Vec<DetailField>,
    /// Wrapper directory stripping rule
    pub strip_root: StripRule,
    /// Desktop entry fields
    pub desktop: DesktopEntrySpec,
    /// Per-user directories removed by `uninstall` without `--keep-config`
    pub user_dirs: UserDirs,
}

impl PackageSpec {
    /// The built-in windsurf editor package.
    #[must_use]
    pub fn windsurf() -> Self {
        Self {
            name: "windsurf".to_string(),
            display_name: "Windsurf".to_string(),
            api_url: WINDSURF_API_URL.to_string(),
            version_field: "windsurfVersion".to_string(),
            url_field: "url".to_string(),
            metadata_path: "resources/app/product.json".to_string(),
            binary: "windsurf".to_string(),
            icon_path: "resources/app/resources/linux/code.png".to_string(),
            detail_fields: vec![
                DetailField::new("Codeium", "codeiumVersion"),
                DetailField::new("VS Core", "version"),
            ],
            strip_root: StripRule::SingleDirectory,
            desktop: DesktopEntrySpec {
                comment: "Windsurf Code Editor".to_string(),
                generic_name: "Text Editor".to_string(),
                categories: vec!["TextEditor".into(), "Development".into(), "IDE".into()],
                mime_types: vec![
                    "text/plain".into(),
                    "inode/directory".into(),
                    "application/x-code-workspace".into(),
                ],
                keywords: vec![
                    "windsurf".into(),
                    "editor".into(),
                    "code".into(),
                    "development".into(),
                ],
                wm_class: "windsurf".to_string(),
            },
            user_dirs: UserDirs {
                config: vec!["windsurf".to_string()],
                cache: vec!["windsurf".to_string()],
            },
        }
    }

    /// Template for a package that only exists in configuration.
    ///
    /// Takes the windsurf conventions, renamed to `name`. The endpoint is left
    /// empty and must come from configuration.
    fn template(name: &str) -> Self {
        let mut spec = Self::windsurf();
        spec.name = name.to_string();
        spec.display_name = name.to_string();
        spec.api_url = String::new();
        spec.binary = name.to_string();
        spec.detail_fields = Vec::new();
        spec.desktop.comment = name.to_string();
        spec.desktop.generic_name = "Application".to_string();
        spec.desktop.categories = vec!["Utility".to_string()];
        spec.desktop.mime_types = Vec::new();
        spec.desktop.keywords = vec![name.to_string()];
        spec.desktop.wm_class = name.to_string();
        spec.user_dirs = UserDirs {
            config: vec![name.to_string()],
            cache: vec![name.to_string()],
        };
        spec
    }

    /// File name of the launcher placed in the bin directory.
    ///
    /// The last component of [`PackageSpec::binary`].
    #[must_use]
    pub fn launcher_name(&self) -> &str {
        self.binary.rsplit('/').next().unwrap_or(&self.binary)
    }
}

/// A `[packages.<name>]` table; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_fields: Option<Vec<DetailField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_root: Option<StripRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<DesktopEntrySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_dirs: Option<UserDirs>,
}

impl PackageConfig {
    /// Resolves this table into a full spec for package `name`.
    ///
    /// `windsurf` starts from the built-in spec; any other name starts from a
    /// renamed template and must set `api_url`.
    ///
    /// # Errors
    ///
    /// [`LpmError::ConfigError`] when `name` is not a single plain path
    /// component, `api_url` is missing, or `binary` is not a relative path
    /// ending in a file name.
    pub fn resolve(&self, name: &str) -> Result<PackageSpec, LpmError> {
        if !is_single_component(name) {
            return Err(LpmError::ConfigError {
                message: format!("package name '{name}' must be a single directory name"),
            });
        }

        let mut spec = if name == "windsurf" {
            PackageSpec::windsurf()
        } else {
            PackageSpec::template(name)
        };

        if let Some(v) = &self.display_name {
            spec.display_name.clone_from(v);
        }
        if let Some(v) = &self.api_url {
            spec.api_url.clone_from(v);
        }
        if let Some(v) = &self.version_field {
            spec.version_field.clone_from(v);
        }
        if let Some(v) = &self.url_field {
            spec.url_field.clone_from(v);
        }
        if let Some(v) = &self.metadata_path {
            spec.metadata_path.clone_from(v);
        }
        if let Some(v) = &self.binary {
            spec.binary.clone_from(v);
        }
        if let Some(v) = &self.icon_path {
            spec.icon_path.clone_from(v);
        }
        if let Some(v) = &self.detail_fields {
            spec.detail_fields.clone_from(v);
        }
        if let Some(v) = &self.strip_root {
            spec.strip_root = v.clone();
        }
        if let Some(v) = &self.desktop {
            spec.desktop = v.clone();
        }
        if let Some(v) = &self.user_dirs {
            spec.user_dirs = v.clone();
        }

        if spec.api_url.trim().is_empty() {
            return Err(LpmError::ConfigError {
                message: format!("package '{name}' has no api_url"),
            });
        }
        let binary_is_relative =
            Path::new(&spec.binary).components().all(|c| matches!(c, Component::Normal(_)));
        if !binary_is_relative || !is_single_component(spec.launcher_name()) {
            return Err(LpmError::ConfigError {
                message: format!(
                    "package '{name}' binary must be a path relative to the install directory"
                ),
            });
        }

        Ok(spec)
    }
}

/// `true` for a non-empty name that joins as exactly one directory entry.
fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}
