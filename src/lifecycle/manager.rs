//! Install, update, uninstall and version for one package
//!
//! [`LifecycleManager`] ties the version source, fetcher and installer to a
//! [`Layout`]. The install directory is the only state it keeps; everything
//! else is derived from the directory and the metadata file inside it.
//!
//! Failures in the core path (version query, download, extraction, directory
//! replacement) abort the operation. The auxiliary artifacts are reported as
//! [`Step`]s and never fail it.

use crate::config::{Layout, LpmConfig, NetworkConfig, PackageSpec, SchedulerConfig};
use crate::core::LpmError;
use crate::lifecycle::archive::ArchiveInstaller;
use crate::lifecycle::artifacts::{ArtifactRenderer, UpdateCommand, remove_artifact, write_artifact};
use crate::lifecycle::fetcher::ArchiveFetcher;
use crate::lifecycle::http::build_client;
use crate::lifecycle::installed::InstalledPackage;
use crate::lifecycle::report::{
    Artifact, InstallReport, Step, StepOutcome, UninstallReport, UpdateReport, VersionReport,
};
use crate::lifecycle::scheduler::UpdateScheduler;
use crate::lifecycle::version_source::{HttpVersionSource, VersionDescriptor};
use crate::utils::fs::{TempDir, remove_dir_all};
use anyhow::Result;

/// Drives the lifecycle of a single package.
///
/// # Examples
///
/// ```rust,no_run
/// use lpm_cli::config::LpmConfig;
/// use lpm_cli::lifecycle::LifecycleManager;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = LpmConfig::load_with_optional(None).await?;
/// let manager = LifecycleManager::from_config(&config, "windsurf")?;
///
/// let report = manager.install(false, false).await?;
/// println!("Installed {} {}", report.package, report.version);
/// for advisory in report.advisories() {
///     eprintln!("warning: {advisory}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LifecycleManager {
    spec: PackageSpec,
    layout: Layout,
    source: HttpVersionSource,
    fetcher: ArchiveFetcher,
    installer: ArchiveInstaller,
    scheduler: UpdateScheduler,
    renderer: ArtifactRenderer,
    update_command: UpdateCommand,
}

impl LifecycleManager {
    /// Creates a manager for `spec` under `layout`.
    ///
    /// The generated update command runs the current executable without a
    /// config path; see [`LifecycleManager::with_update_command`].
    pub fn new(
        spec: PackageSpec,
        layout: Layout,
        network: &NetworkConfig,
        scheduler: &SchedulerConfig,
    ) -> Result<Self> {
        let client = build_client(network)?;
        let label = format!("Downloading {}", spec.display_name);
        Ok(Self {
            source: HttpVersionSource::new(client.clone(), &spec),
            fetcher: ArchiveFetcher::new(client).with_label(label),
            installer: ArchiveInstaller::new(spec.strip_root.clone()),
            scheduler: UpdateScheduler::new(scheduler),
            renderer: ArtifactRenderer::new()?,
            update_command: UpdateCommand::current(None)?,
            spec,
            layout,
        })
    }

    /// Creates a manager for the package `name` as configured in `config`.
    pub fn from_config(config: &LpmConfig, name: &str) -> Result<Self> {
        let spec = config.package(name)?;
        let layout = config.layout()?;
        Self::new(spec, layout, &config.network, &config.scheduler)
    }

    /// Replaces the command written to `update-<package>`.
    #[must_use]
    pub fn with_update_command(mut self, command: UpdateCommand) -> Self {
        self.update_command = command;
        self
    }

    #[must_use]
    pub fn spec(&self) -> &PackageSpec {
        &self.spec
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The package's location on disk.
    #[must_use]
    pub fn installed(&self) -> InstalledPackage {
        InstalledPackage::locate(&self.layout, &self.spec)
    }

    /// Installs the latest release and provisions the auxiliary artifacts.
    ///
    /// With `force`, an existing install is replaced. With `skip_auto_update`
    /// (or when scheduling is disabled in configuration) no timer is registered.
    ///
    /// # Errors
    ///
    /// - [`LpmError::AlreadyInstalled`] when installed and `force` is not set;
    ///   nothing is touched
    /// - any version source, fetch or installer error
    pub async fn install(&self, force: bool, skip_auto_update: bool) -> Result<InstallReport> {
        let installed = self.installed();
        if installed.exists() && !force {
            return Err(LpmError::AlreadyInstalled {
                package: self.spec.name.clone(),
                path: installed.install_dir().display().to_string(),
            }
            .into());
        }

        let latest = self.source.fetch_latest().await?;
        tracing::info!(target: "lifecycle", "Installing {} {}", self.spec.name, latest.version);
        self.fetch_and_install(&latest, &installed).await?;

        let mut steps = vec![
            write_artifact(
                Artifact::Launcher,
                &self.layout.launcher_path(&self.spec),
                self.renderer.launcher(&self.layout, &self.spec),
                true,
            ),
            write_artifact(
                Artifact::DesktopEntry,
                &self.layout.desktop_entry_path(&self.spec),
                self.renderer.desktop_entry(&self.layout, &self.spec),
                false,
            ),
            write_artifact(
                Artifact::UpdateCommand,
                &self.layout.update_script_path(&self.spec),
                self.renderer.update_command(&self.spec, &self.update_command),
                true,
            ),
        ];

        let timer_path = self.layout.timer_path(&self.spec);
        if skip_auto_update {
            steps.push(Step::new(
                Artifact::ScheduledUpdate,
                timer_path,
                StepOutcome::Skipped("--skip-auto-update was given".to_string()),
            ));
        } else if !self.scheduler.enabled() {
            steps.push(Step::new(
                Artifact::ScheduledUpdate,
                timer_path,
                StepOutcome::Skipped("scheduled updates are disabled in configuration".to_string()),
            ));
        } else {
            steps.extend(self.scheduler.register(&self.renderer, &self.layout, &self.spec).await);
        }

        Ok(InstallReport {
            package: self.spec.name.clone(),
            version: latest.version,
            install_dir: installed.install_dir().to_path_buf(),
            steps,
        })
    }

    /// Replaces the install with the latest release when the versions differ.
    ///
    /// Versions are compared as opaque strings. An installed metadata file
    /// without the version field counts as version `unknown`.
    ///
    /// # Errors
    ///
    /// - [`LpmError::NotInstalled`] when there is no install directory
    /// - [`LpmError::MetadataMissing`] when the metadata file is absent
    /// - any version source, fetch or installer error
    pub async fn update(&self) -> Result<UpdateReport> {
        let installed = self.installed();
        if !installed.exists() {
            return Err(LpmError::NotInstalled {
                package: self.spec.name.clone(),
            }
            .into());
        }

        let Some(metadata) = installed.read_metadata().await? else {
            return Err(LpmError::MetadataMissing {
                package: self.spec.name.clone(),
                path: installed.metadata_path().display().to_string(),
            }
            .into());
        };
        let current = metadata.field_or_unknown(&self.spec.version_field);

        let latest = self.source.fetch_latest().await?;
        if latest.version == current {
            tracing::info!(target: "lifecycle", "{} {} is already current", self.spec.name, current);
            return Ok(UpdateReport::AlreadyCurrent {
                version: current,
            });
        }

        tracing::info!(
            target: "lifecycle",
            "Updating {} from {} to {}",
            self.spec.name,
            current,
            latest.version
        );
        self.fetch_and_install(&latest, &installed).await?;

        Ok(UpdateReport::Updated {
            from: current,
            to: latest.version,
        })
    }

    /// Removes the package and everything install created.
    ///
    /// Auxiliary artifacts are removed independently; missing ones count as
    /// removed and failures are advisory. Unless `keep_config` is set, the
    /// package's configuration and cache directories go too. Running it on an
    /// uninstalled package succeeds.
    ///
    /// # Errors
    ///
    /// [`LpmError::FileSystemError`] when the install directory exists but
    /// cannot be removed.
    pub async fn uninstall(&self, keep_config: bool) -> Result<UninstallReport> {
        let mut steps = self.scheduler.unregister(&self.layout, &self.spec).await;
        steps.push(remove_artifact(Artifact::Launcher, &self.layout.launcher_path(&self.spec)));
        steps.push(remove_artifact(
            Artifact::UpdateCommand,
            &self.layout.update_script_path(&self.spec),
        ));
        steps.push(remove_artifact(
            Artifact::DesktopEntry,
            &self.layout.desktop_entry_path(&self.spec),
        ));

        let installed = self.installed();
        let removed_install_dir = installed.exists();
        if removed_install_dir {
            remove_dir_all(installed.install_dir()).map_err(|e| LpmError::FileSystemError {
                operation: "remove".to_string(),
                path: installed.install_dir().display().to_string(),
                reason: format!("{e:#}"),
            })?;
            tracing::info!(target: "lifecycle", "Removed {}", installed.install_dir().display());
        }

        if !keep_config {
            for dir in self.layout.user_data_dirs(&self.spec) {
                let result = if dir.exists() {
                    remove_dir_all(&dir).map(|()| StepOutcome::Applied)
                } else {
                    Ok(StepOutcome::Absent)
                };
                steps.push(Step::from_result(Artifact::UserData, dir, result));
            }
        }

        Ok(UninstallReport {
            package: self.spec.name.clone(),
            removed_install_dir,
            steps,
        })
    }

    /// Reads the installed state without touching anything.
    ///
    /// # Errors
    ///
    /// Only when the metadata file exists but cannot be read.
    pub async fn version(&self) -> Result<VersionReport> {
        let installed = self.installed();
        if !installed.exists() {
            return Ok(VersionReport::NotInstalled);
        }

        let Some(metadata) = installed.read_metadata().await? else {
            return Ok(VersionReport::MetadataMissing {
                path: installed.metadata_path().to_path_buf(),
            });
        };

        let details = self
            .spec
            .detail_fields
            .iter()
            .map(|d| (d.label.clone(), metadata.field_or_unknown(&d.field)))
            .collect();

        Ok(VersionReport::Installed {
            version: metadata.field_or_unknown(&self.spec.version_field),
            details,
        })
    }

    /// Downloads `release` into a staging area and installs it.
    ///
    /// The staging area, including a partial download, is removed on return.
    async fn fetch_and_install(
        &self,
        release: &VersionDescriptor,
        installed: &InstalledPackage,
    ) -> Result<()> {
        let staging = TempDir::new(&format!("{}_download", self.spec.name))?;
        let archive = staging.path().join(format!("{}.tar.gz", self.spec.name));

        self.fetcher.fetch(&release.download_url, &archive).await?;
        self.installer.install(&archive, installed.install_dir()).await
    }
}
