//! Update an installed package to the latest release.

use super::Session;
use crate::lifecycle::UpdateReport;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Command to update a package.
#[derive(Args, Debug)]
pub struct UpdateCommand {}

impl UpdateCommand {
    pub(crate) async fn execute(self, session: &Session) -> Result<()> {
        let manager = session.manager()?;
        let display_name = &manager.spec().display_name;
        println!("{}", format!("Checking for {display_name} updates...").cyan());

        match manager.update().await? {
            UpdateReport::AlreadyCurrent {
                version,
            } => {
                println!("{}", format!("{display_name} is already up to date ({version})").green());
            }
            UpdateReport::Updated {
                from,
                to,
            } => {
                println!("{}", format!("{display_name} updated from {from} to {to}").green());
            }
        }
        Ok(())
    }
}
