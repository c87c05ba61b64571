//! Remove a package and the artifacts `install` created.

use super::{Session, print_advisories};
use crate::lifecycle::{Artifact, StepOutcome};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Command to uninstall a package.
#[derive(Args, Debug)]
pub struct UninstallCommand {
    /// Keep the per-user configuration and cache directories
    #[arg(long)]
    pub(crate) keep_config: bool,
}

impl UninstallCommand {
    pub(crate) async fn execute(self, session: &Session) -> Result<()> {
        let manager = session.manager()?;
        let display_name = &manager.spec().display_name;
        println!("{}", format!("Uninstalling {display_name}...").yellow());

        let report = manager.uninstall(self.keep_config).await?;

        for step in &report.steps {
            if step.artifact == Artifact::UserData && step.outcome == StepOutcome::Applied {
                println!("  Removed {}", step.target.display());
            }
        }
        print_advisories(&report.advisories());

        if report.removed_install_dir {
            println!("{}", format!("{display_name} uninstalled").green());
        } else {
            println!("{}", format!("{display_name} was not installed; cleaned up leftovers").green());
        }
        if self.keep_config {
            println!("Configuration and cache directories were kept");
        }
        Ok(())
    }
}
