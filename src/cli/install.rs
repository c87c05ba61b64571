//! Install the latest release of a package.
//!
//! ```bash
//! lpm install
//! lpm install --force
//! lpm --package tool install --skip-auto-update
//! ```

use super::{Session, print_advisories};
use crate::lifecycle::{Artifact, StepOutcome};
use crate::utils::platform::dir_on_path;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Command to install a package.
#[derive(Args, Debug)]
pub struct InstallCommand {
    /// Reinstall even when the package is already installed
    #[arg(short, long)]
    pub(crate) force: bool,

    /// Do not register the weekly update timer
    #[arg(long)]
    pub(crate) skip_auto_update: bool,
}

impl InstallCommand {
    pub(crate) async fn execute(self, session: &Session) -> Result<()> {
        let manager = session.manager()?;
        let display_name = &manager.spec().display_name;
        println!("{}", format!("Installing {display_name}...").yellow());

        let report = manager.install(self.force, self.skip_auto_update).await?;

        println!(
            "{}",
            format!(
                "{} {} installed to {}",
                display_name,
                report.version,
                report.install_dir.display()
            )
            .green()
        );

        for step in &report.steps {
            match (&step.artifact, &step.outcome) {
                (Artifact::Launcher, StepOutcome::Applied) => {
                    println!("  Launcher: {}", step.target.display());
                }
                (Artifact::ScheduledUpdate, StepOutcome::Applied) => {
                    println!("  Weekly updates enabled ({})", step.target.display());
                }
                (Artifact::ScheduledUpdate, StepOutcome::Skipped(reason)) => {
                    println!("  Automatic updates not enabled: {reason}");
                }
                _ => {}
            }
        }
        print_advisories(&report.advisories());

        let bin_dir = &manager.layout().bin_dir;
        if !dir_on_path(bin_dir) {
            println!();
            println!("{} is not on your PATH. Add it with:", bin_dir.display());
            println!("  export PATH=\"{}:$PATH\"", bin_dir.display());
        }

        Ok(())
    }
}
