//! Script wrappers
//!
//! Remote scripts are published under a base URL. Installing one writes a small
//! executable into the bin directory that runs the current remote version
//! through the configured runner (`uv run --quiet` by default). With
//! `--download` the script itself is fetched and installed instead.
//!
//! The catalog maps command names to script file names. Two entries are built
//! in; `[scripts.entries]` in the config file adds more or overrides them.

use crate::config::{LpmConfig, ScriptsConfig};
use crate::core::LpmError;
use crate::lifecycle::{ArchiveFetcher, build_client};
use crate::utils::fs::{ensure_dir, remove_file_if_exists, set_executable, write_executable};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strsim::levenshtein;

/// Maximum edit distance, as a percentage of the requested name's length,
/// for a catalog entry to be suggested.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Command names and script files that are always available.
const BUILTIN_SCRIPTS: &[(&str, &str)] = &[
    ("git-bare-clone", "git_bare_clone.py"),
    ("install-windsurf", "install_windsurf.py"),
];

/// Command name to script file mapping plus where and how scripts run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCatalog {
    entries: BTreeMap<String, String>,
    base_url: String,
    runner: String,
}

impl ScriptCatalog {
    /// Built-in entries merged with the configured ones.
    #[must_use]
    pub fn from_config(config: &ScriptsConfig) -> Self {
        let mut entries: BTreeMap<String, String> =
            BUILTIN_SCRIPTS.iter().map(|(name, file)| ((*name).to_string(), (*file).to_string())).collect();
        entries.extend(config.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            entries,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            runner: config.runner.clone(),
        }
    }

    /// `(command name, script file)` pairs, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// URL of the script behind `name`.
    ///
    /// # Errors
    ///
    /// [`LpmError::UnknownScript`] with the available names and the closest
    /// match when `name` is not in the catalog.
    pub fn script_url(&self, name: &str) -> Result<String, LpmError> {
        let file = self.entries.get(name).ok_or_else(|| self.unknown(name))?;
        Ok(format!("{}/{}", self.base_url, file))
    }

    /// Contents of the wrapper for `name`.
    pub fn wrapper(&self, name: &str) -> Result<String, LpmError> {
        let url = self.script_url(name)?;
        Ok(format!(
            "#!/bin/sh\n# Generated wrapper for {name} by lpm\nexec {} {url} \"$@\"\n",
            self.runner
        ))
    }

    fn unknown(&self, name: &str) -> LpmError {
        let suggestion = self
            .entries
            .keys()
            .map(|candidate| (candidate, levenshtein(name, candidate)))
            .filter(|(_, distance)| *distance <= name.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .min_by_key(|(_, distance)| *distance)
            .map(|(candidate, _)| candidate.clone());

        LpmError::UnknownScript {
            name: name.to_string(),
            available: self.entries.keys().cloned().collect(),
            suggestion,
        }
    }
}

/// Outcome of a script install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledScript {
    /// Command name
    pub name: String,
    /// Installed executable
    pub path: PathBuf,
    /// Remote script URL
    pub url: String,
    /// Whether the script itself was downloaded rather than wrapped
    pub downloaded: bool,
}

/// Installs catalog scripts into a bin directory.
#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    catalog: ScriptCatalog,
    bin_dir: PathBuf,
    fetcher: ArchiveFetcher,
}

impl ScriptInstaller {
    #[must_use]
    pub fn new(catalog: ScriptCatalog, bin_dir: PathBuf, fetcher: ArchiveFetcher) -> Self {
        Self {
            catalog,
            bin_dir,
            fetcher,
        }
    }

    /// Installer for the configured catalog and bin directory.
    pub fn from_config(config: &LpmConfig) -> Result<Self> {
        let client = build_client(&config.network)?;
        Ok(Self::new(
            ScriptCatalog::from_config(&config.scripts),
            config.layout()?.bin_dir,
            ArchiveFetcher::new(client).with_label("Downloading script"),
        ))
    }

    #[must_use]
    pub fn catalog(&self) -> &ScriptCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Installs `name` as `<bin_dir>/<name>` with mode `0o755`.
    ///
    /// Without `download` a wrapper running the remote script is written;
    /// with it, the script is streamed into place. Any partially written
    /// target is removed on failure.
    ///
    /// # Errors
    ///
    /// - [`LpmError::UnknownScript`] for names not in the catalog; nothing is written
    /// - [`LpmError::NetworkError`] when a download fails
    /// - file system errors when the target cannot be written
    pub async fn install(&self, name: &str, download: bool) -> Result<InstalledScript> {
        let url = self.catalog.script_url(name)?;
        let path = self.bin_dir.join(name);
        ensure_dir(&self.bin_dir)?;

        tracing::info!(target: "scripts", "Installing {} to {} from {}", name, path.display(), url);
        let result = if download {
            self.download(&url, &path).await
        } else {
            self.catalog.wrapper(name).map_err(anyhow::Error::from).and_then(|w| write_executable(&path, &w))
        };

        if let Err(e) = result {
            if let Err(cleanup) = remove_file_if_exists(&path) {
                tracing::warn!(target: "scripts", "Could not remove {}: {:#}", path.display(), cleanup);
            }
            return Err(e);
        }

        Ok(InstalledScript {
            name: name.to_string(),
            path,
            url,
            downloaded: download,
        })
    }

    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        self.fetcher.fetch(url, path).await?;
        set_executable(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use httpmock::prelude::*;

    fn catalog_with(base_url: &str) -> ScriptCatalog {
        let mut config = ScriptsConfig::default();
        config.base_url = base_url.to_string();
        config.entries.insert("hello".to_string(), "hello.py".to_string());
        ScriptCatalog::from_config(&config)
    }

    fn installer(base_url: &str, bin_dir: &Path) -> ScriptInstaller {
        ScriptInstaller::new(
            catalog_with(base_url),
            bin_dir.to_path_buf(),
            ArchiveFetcher::new(build_client(&NetworkConfig::default()).unwrap()),
        )
    }

    #[test]
    fn test_catalog_merges_builtin_and_configured() {
        let catalog = catalog_with("https://scripts.example.com/");
        let names: Vec<&str> = catalog.entries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["git-bare-clone", "hello", "install-windsurf"]);
        assert_eq!(
            catalog.script_url("git-bare-clone").unwrap(),
            "https://scripts.example.com/git_bare_clone.py"
        );
    }

    #[test]
    fn test_wrapper_contents() {
        let catalog = catalog_with("https://scripts.example.com");
        assert_eq!(
            catalog.wrapper("hello").unwrap(),
            "#!/bin/sh\n# Generated wrapper for hello by lpm\nexec uv run --quiet https://scripts.example.com/hello.py \"$@\"\n"
        );
    }

    #[test]
    fn test_unknown_name_suggests_closest() {
        let catalog = catalog_with("https://scripts.example.com");
        match catalog.script_url("git-bare-clon") {
            Err(LpmError::UnknownScript {
                available,
                suggestion,
                ..
            }) => {
                assert_eq!(suggestion.as_deref(), Some("git-bare-clone"));
                assert_eq!(available.len(), 3);
            }
            other => panic!("Expected UnknownScript, got {other:?}"),
        }

        match catalog.script_url("zzz") {
            Err(LpmError::UnknownScript {
                suggestion,
                ..
            }) => assert_eq!(suggestion, None),
            other => panic!("Expected UnknownScript, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_install_wrapper_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("bin");

        let installed = installer("https://scripts.example.com", &bin).install("hello", false).await.unwrap();

        assert_eq!(installed.path, bin.join("hello"));
        assert!(!installed.downloaded);
        let content = std::fs::read_to_string(&installed.path).unwrap();
        assert!(content.contains("exec uv run --quiet https://scripts.example.com/hello.py \"$@\""));
        let mode = std::fs::metadata(&installed.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[tokio::test]
    async fn test_install_unknown_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("bin");

        let err = installer("https://scripts.example.com", &bin).install("nope", false).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<LpmError>(), Some(LpmError::UnknownScript { .. })));
        assert!(!bin.join("nope").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_streams_script() {
        use std::os::unix::fs::PermissionsExt;

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/hello.py");
                then.status(200).body("#!/usr/bin/env python3\nprint('hello')\n");
            })
            .await;
        let temp = tempfile::tempdir().unwrap();

        let installed = installer(&server.base_url(), temp.path()).install("hello", true).await.unwrap();

        mock.assert_async().await;
        assert!(installed.downloaded);
        assert_eq!(
            std::fs::read_to_string(&installed.path).unwrap(),
            "#!/usr/bin/env python3\nprint('hello')\n"
        );
        let mode = std::fs::metadata(&installed.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[tokio::test]
    async fn test_failed_download_removes_target() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/hello.py");
                then.status(404);
            })
            .await;
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("hello"), "stale").unwrap();

        let err = installer(&server.base_url(), temp.path()).install("hello", true).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<LpmError>(), Some(LpmError::NetworkError { .. })));
        assert!(!temp.path().join("hello").exists());
    }
}
