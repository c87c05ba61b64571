//! Scheduled updates through a systemd user timer
//!
//! Registration writes `<package>-update.service` and `<package>-update.timer`
//! and activates the timer with `systemctl --user`. Every step is advisory:
//! systems without a user systemd instance still get a working install.

use crate::config::{Layout, PackageSpec, SchedulerConfig};
use crate::lifecycle::artifacts::{ArtifactRenderer, remove_artifact, write_artifact};
use crate::lifecycle::report::{Artifact, Step, StepOutcome};
use crate::process::ProcessCommand;
use anyhow::Result;

/// Registers and unregisters the update timer of a package.
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    systemctl: String,
    enabled: bool,
}

impl UpdateScheduler {
    #[must_use]
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            systemctl: config.systemctl.clone(),
            enabled: config.enabled,
        }
    }

    /// Whether install registers the timer.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    async fn systemctl(&self, args: &[&str]) -> Result<()> {
        ProcessCommand::systemctl_user(&self.systemctl, args.iter().copied())
            .with_context("Managing update timer")
            .execute_success()
            .await
    }

    async fn activate(&self, timer_unit: &str) -> Result<StepOutcome> {
        self.systemctl(&["daemon-reload"]).await?;
        self.systemctl(&["enable", timer_unit]).await?;
        self.systemctl(&["start", timer_unit]).await?;
        tracing::info!(target: "lifecycle", "Enabled {}", timer_unit);
        Ok(StepOutcome::Applied)
    }

    /// Writes both units, then reloads systemd and enables and starts the timer.
    ///
    /// Activation is skipped when a unit file could not be written.
    pub async fn register(&self, renderer: &ArtifactRenderer, layout: &Layout, spec: &PackageSpec) -> Vec<Step> {
        let service_path = layout.service_path(spec);
        let timer_path = layout.timer_path(spec);

        let service =
            write_artifact(Artifact::ServiceUnit, &service_path, renderer.service_unit(layout, spec), false);
        let timer = write_artifact(Artifact::TimerUnit, &timer_path, renderer.timer_unit(spec), false);

        let timer_unit = format!("{}.timer", Layout::unit_stem(spec));
        let activation = if service.advisory().is_some() || timer.advisory().is_some() {
            Step::new(
                Artifact::ScheduledUpdate,
                &timer_path,
                StepOutcome::Skipped("unit files could not be written".to_string()),
            )
        } else {
            let result = self.activate(&timer_unit).await;
            Step::from_result(Artifact::ScheduledUpdate, &timer_path, result)
        };

        vec![service, timer, activation]
    }

    /// Stops and disables the timer, removes both units and reloads systemd.
    ///
    /// Stopping and disabling are best effort and only attempted when the timer
    /// unit exists. Missing units count as removed.
    pub async fn unregister(&self, layout: &Layout, spec: &PackageSpec) -> Vec<Step> {
        let service_path = layout.service_path(spec);
        let timer_path = layout.timer_path(spec);
        let timer_unit = format!("{}.timer", Layout::unit_stem(spec));

        let deactivation = if timer_path.exists() {
            let mut failures = Vec::new();
            for action in ["stop", "disable"] {
                if let Err(e) = self.systemctl(&[action, timer_unit.as_str()]).await {
                    tracing::debug!(target: "lifecycle", "systemctl {} {} failed: {:#}", action, timer_unit, e);
                    failures.push(action);
                }
            }
            let outcome = if failures.is_empty() {
                StepOutcome::Applied
            } else {
                StepOutcome::Skipped(format!("could not {} the timer", failures.join(" or ")))
            };
            Step::new(Artifact::ScheduledUpdate, &timer_path, outcome)
        } else {
            Step::new(Artifact::ScheduledUpdate, &timer_path, StepOutcome::Absent)
        };

        let service = remove_artifact(Artifact::ServiceUnit, &service_path);
        let timer = remove_artifact(Artifact::TimerUnit, &timer_path);

        if (service.outcome == StepOutcome::Applied || timer.outcome == StepOutcome::Applied)
            && let Err(e) = self.systemctl(&["daemon-reload"]).await
        {
            tracing::debug!(target: "lifecycle", "systemctl daemon-reload failed: {:#}", e);
        }

        vec![deactivation, service, timer]
    }
}
