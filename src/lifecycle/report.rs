//! Outcomes of lifecycle operations
//!
//! The archive install itself either succeeds or aborts the operation. The
//! auxiliary artifacts around it (launcher, desktop entry, update command,
//! scheduled update, per-user data) are advisory: each one is recorded as a
//! [`Step`] and a failure becomes an [`Advisory`] instead of an error.

use std::fmt;
use std::path::PathBuf;

/// Auxiliary artifact touched by install or uninstall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// `~/.local/bin/<binary>`
    Launcher,
    /// `~/.local/share/applications/<package>.desktop`
    DesktopEntry,
    /// `~/.local/bin/update-<package>`
    UpdateCommand,
    /// systemd user service unit
    ServiceUnit,
    /// systemd user timer unit
    TimerUnit,
    /// Timer registration with `systemctl --user`
    ScheduledUpdate,
    /// Per-user configuration or cache directory
    UserData,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Launcher => "launcher",
            Self::DesktopEntry => "desktop entry",
            Self::UpdateCommand => "update command",
            Self::ServiceUnit => "update service unit",
            Self::TimerUnit => "update timer unit",
            Self::ScheduledUpdate => "scheduled update",
            Self::UserData => "user data",
        };
        f.write_str(name)
    }
}

/// What happened to one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Created, written or removed as requested
    Applied,
    /// Nothing to remove
    Absent,
    /// Deliberately not done, with the reason
    Skipped(String),
    /// Attempted and failed; the operation still succeeded
    Failed(String),
}

/// One advisory step of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Artifact the step concerns
    pub artifact: Artifact,
    /// File, directory or unit involved
    pub target: PathBuf,
    /// Result of the step
    pub outcome: StepOutcome,
}

impl Step {
    pub(crate) fn new(artifact: Artifact, target: impl Into<PathBuf>, outcome: StepOutcome) -> Self {
        Self {
            artifact,
            target: target.into(),
            outcome,
        }
    }

    /// Builds a step from the result of an attempt, logging failures.
    pub(crate) fn from_result(
        artifact: Artifact,
        target: impl Into<PathBuf>,
        result: anyhow::Result<StepOutcome>,
    ) -> Self {
        let target = target.into();
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    target: "lifecycle",
                    "{} step failed for {}: {:#}",
                    artifact,
                    target.display(),
                    e
                );
                StepOutcome::Failed(format!("{e:#}"))
            }
        };
        Self::new(artifact, target, outcome)
    }

    /// The advisory raised by this step, if it failed.
    #[must_use]
    pub fn advisory(&self) -> Option<Advisory> {
        match &self.outcome {
            StepOutcome::Failed(message) => Some(Advisory {
                artifact: self.artifact,
                target: self.target.clone(),
                message: message.clone(),
            }),
            _ => None,
        }
    }
}

/// A non-fatal failure reported alongside a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    /// Artifact that could not be handled
    pub artifact: Artifact,
    /// File, directory or unit involved
    pub target: PathBuf,
    /// Cause of the failure
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.artifact, self.target.display(), self.message)
    }
}

fn collect_advisories(steps: &[Step]) -> Vec<Advisory> {
    steps.iter().filter_map(Step::advisory).collect()
}

/// Result of a successful install.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Package name
    pub package: String,
    /// Version that was installed
    pub version: String,
    /// Install directory
    pub install_dir: PathBuf,
    /// Auxiliary artifact steps, in order
    pub steps: Vec<Step>,
}

impl InstallReport {
    /// Failed auxiliary steps
    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        collect_advisories(&self.steps)
    }
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateReport {
    /// Installed version equals the latest version; nothing was touched
    AlreadyCurrent {
        /// The installed (and latest) version
        version: String,
    },
    /// The install directory was replaced
    Updated {
        /// Version before the update
        from: String,
        /// Version after the update
        to: String,
    },
}

/// Result of a successful uninstall.
#[derive(Debug, Clone)]
pub struct UninstallReport {
    /// Package name
    pub package: String,
    /// Whether an install directory existed and was removed
    pub removed_install_dir: bool,
    /// Auxiliary artifact steps, in order
    pub steps: Vec<Step>,
}

impl UninstallReport {
    /// Failed auxiliary steps
    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        collect_advisories(&self.steps)
    }
}

/// Installed state as reported by `version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionReport {
    /// No install directory
    NotInstalled,
    /// Install directory present, metadata file absent
    MetadataMissing {
        /// Expected metadata file location
        path: PathBuf,
    },
    /// Installed with readable metadata
    Installed {
        /// Package version (`unknown` when the field is absent)
        version: String,
        /// Labelled detail fields, in configured order
        details: Vec<(String, String)>,
    },
}
