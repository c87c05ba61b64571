use anyhow::Result;
use clap::Parser;
use lpm_cli::cli;
use lpm_cli::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = cli.build_config();
    // SAFETY: still single-threaded, the tokio runtime is built below.
    unsafe { config.apply_to_env() };

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(cli.execute_with_config(config)) {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
