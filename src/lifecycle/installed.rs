//! The package as it exists on disk
//!
//! Whether a package is installed is decided by its install directory alone.
//! The version is read on demand from a JSON metadata file inside it, looked up
//! by field name; nothing else about the file's structure is assumed.

use crate::config::{Layout, PackageSpec};
use crate::constants::UNKNOWN_VERSION;
use crate::core::LpmError;
use anyhow::Result;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Location of an installed (or installable) package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    install_dir: PathBuf,
    metadata_path: PathBuf,
}

impl InstalledPackage {
    /// Where `spec` lives under `layout`.
    #[must_use]
    pub fn locate(layout: &Layout, spec: &PackageSpec) -> Self {
        let install_dir = layout.install_dir(spec);
        let metadata_path = install_dir.join(&spec.metadata_path);
        Self {
            install_dir,
            metadata_path,
        }
    }

    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    #[must_use]
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// `true` when the install directory exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.install_dir.exists()
    }

    /// Reads the metadata file.
    ///
    /// Returns `Ok(None)` when the file does not exist. A file that is not a
    /// JSON object reads as empty metadata, so every field comes back unknown.
    ///
    /// # Errors
    ///
    /// [`LpmError::FileSystemError`] when the file exists but cannot be read.
    pub async fn read_metadata(&self) -> Result<Option<Metadata>> {
        let content = match tokio::fs::read_to_string(&self.metadata_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LpmError::FileSystemError {
                    operation: "read".to_string(),
                    path: self.metadata_path.display().to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(fields)) => Ok(Some(Metadata {
                fields,
            })),
            Ok(_) => {
                tracing::warn!(
                    target: "lifecycle",
                    "Metadata file {} is not a JSON object",
                    self.metadata_path.display()
                );
                Ok(Some(Metadata::default()))
            }
            Err(e) => {
                tracing::warn!(
                    target: "lifecycle",
                    "Could not parse metadata file {}: {}",
                    self.metadata_path.display(),
                    e
                );
                Ok(Some(Metadata::default()))
            }
        }
    }
}

/// Fields of an installed package's metadata file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    fields: Map<String, Value>,
}

impl Metadata {
    /// Value of `name` as text.
    ///
    /// Strings are returned as they are; numbers and booleans are formatted.
    /// Missing fields, nulls, arrays and objects yield `None`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Value of `name`, or `unknown` when it is absent.
    #[must_use]
    pub fn field_or_unknown(&self, name: &str) -> String {
        self.field(name).unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }
}
