//! Common helpers for the LPM integration tests
//!
//! Each [`TestEnvironment`] owns a temporary home directory, a mock release
//! server and a config file pointing the windsurf package at that server.
//! Commands run the real `lpm` binary with `HOME` set to the temporary home.

// Not every test module uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use httpmock::Mock;
use httpmock::prelude::*;
use lpm_cli::test_utils::windsurf_archive;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Output of one `lpm` invocation.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Panics with both streams when the command failed.
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "lpm failed with {:?}\nstdout:\n{}\nstderr:\n{}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    /// Panics with both streams when the command succeeded.
    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.success,
            "lpm unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            self.stdout, self.stderr
        );
        self
    }
}

/// Isolated home directory plus a mock release endpoint.
pub struct TestEnvironment {
    pub temp: TempDir,
    pub home: PathBuf,
    pub server: MockServer,
    pub config_path: PathBuf,
}

impl TestEnvironment {
    /// Environment whose scheduler runs `true` in place of `systemctl`.
    pub fn new() -> Result<Self> {
        Self::with_systemctl("true")
    }

    /// Environment whose scheduler runs `systemctl` as given.
    pub fn with_systemctl(systemctl: &str) -> Result<Self> {
        let temp = TempDir::new()?;
        let home = temp.path().join("home");
        fs::create_dir_all(&home)?;
        let server = MockServer::start();
        let config_path = temp.path().join("lpm.toml");

        let config = format!(
            r#"[scheduler]
systemctl = "{systemctl}"

[packages.windsurf]
api_url = "{}"

[scripts]
base_url = "{}"
"#,
            server.url("/api/latest"),
            server.url("/scripts")
        );
        fs::write(&config_path, config)?;

        Ok(Self {
            temp,
            home,
            server,
            config_path,
        })
    }

    /// Serves `version` as the latest release; returns the endpoint and archive mocks.
    pub fn publish(&self, version: &str) -> Result<(Mock<'_>, Mock<'_>)> {
        let archive = windsurf_archive(version).build()?;
        let archive_path = format!("/downloads/windsurf-{version}.tar.gz");
        let url = self.server.url(&archive_path);

        let api = self.server.mock(|when, then| {
            when.method(GET).path("/api/latest");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({ "windsurfVersion": version, "url": url }));
        });
        let download = self.server.mock(|when, then| {
            when.method(GET).path(archive_path.as_str());
            then.status(200).body(archive);
        });
        Ok((api, download))
    }

    /// Install directory of the windsurf package.
    pub fn install_dir(&self) -> PathBuf {
        self.home.join(".local/share/windsurf")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.home.join(".local/bin")
    }

    pub fn desktop_entry(&self) -> PathBuf {
        self.home.join(".local/share/applications/windsurf.desktop")
    }

    pub fn systemd_dir(&self) -> PathBuf {
        self.home.join(".config/systemd/user")
    }

    /// Runs `lpm --no-progress --config <config> <args>` in the temporary home.
    pub fn run_lpm(&self, args: &[&str]) -> Result<CommandOutput> {
        run_lpm_in(&self.home, Some(&self.config_path), args)
    }
}

/// Runs the `lpm` binary with `HOME` pointed at `home`.
pub fn run_lpm_in(home: &Path, config_path: Option<&Path>, args: &[&str]) -> Result<CommandOutput> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lpm"));
    command.arg("--no-progress");
    if let Some(path) = config_path {
        command.arg("--config").arg(path);
    }
    let output = command
        .args(args)
        .current_dir(home)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("LPM_CONFIG_PATH")
        .env_remove("RUST_LOG")
        .output()
        .context("Failed to run lpm command")?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
        code: output.status.code(),
    })
}
