//! List and install script wrappers.

use super::Session;
use crate::scripts::ScriptInstaller;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

/// Script wrapper commands.
#[derive(Subcommand, Debug)]
pub enum ScriptsCommand {
    /// List the available scripts
    List,

    /// Install a script into the bin directory
    Install {
        /// Script name
        name: String,

        /// Download the script instead of writing a wrapper that runs it remotely
        #[arg(long)]
        download: bool,
    },
}

impl ScriptsCommand {
    pub(crate) async fn execute(self, session: &Session) -> Result<()> {
        let installer = ScriptInstaller::from_config(&session.config)?;
        match self {
            Self::List => {
                println!("{}", "Available scripts:".bold());
                for (name, file) in installer.catalog().entries() {
                    println!("  {} ({})", name.cyan(), file);
                }
            }
            Self::Install {
                name,
                download,
            } => {
                let installed = installer.install(&name, download).await?;
                let kind = if installed.downloaded { "script" } else { "wrapper" };
                println!(
                    "{}",
                    format!("Installed {} {} to {}", installed.name, kind, installed.path.display())
                        .green()
                );
                println!("Run it with: {}", installed.name);
            }
        }
        Ok(())
    }
}
