//! Show the installed version of a package.

use super::Session;
use crate::lifecycle::VersionReport;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Command to show the installed version.
#[derive(Args, Debug)]
pub struct VersionCommand {}

impl VersionCommand {
    pub(crate) async fn execute(self, session: &Session) -> Result<()> {
        let manager = session.manager()?;
        let display_name = &manager.spec().display_name;

        match manager.version().await? {
            VersionReport::NotInstalled => {
                println!("{display_name} is not installed");
                println!("Run `lpm --package {} install` to install it", manager.spec().name);
            }
            VersionReport::MetadataMissing {
                path,
            } => {
                println!(
                    "{}",
                    format!("{display_name} is installed but {} is missing", path.display()).yellow()
                );
            }
            VersionReport::Installed {
                version,
                details,
            } => {
                println!("{}", format!("{display_name} Version Information").bold());
                println!("{}", format!("{display_name}: {version}").green());
                for (label, value) in details {
                    println!("{label}: {value}");
                }
            }
        }
        Ok(())
    }
}
