//! Argument parsing and runtime settings of the CLI.

use super::{Cli, Commands};
use crate::cli::scripts::ScriptsCommand;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_help_is_reported_as_error() {
    assert!(Cli::try_parse_from(["lpm", "--help"]).is_err());
    assert!(Cli::try_parse_from(["lpm"]).is_err());
}

#[test]
fn test_default_package_is_windsurf() {
    let cli = Cli::try_parse_from(["lpm", "version"]).unwrap();
    assert_eq!(cli.package, "windsurf");
    assert!(matches!(cli.command, Commands::Version(_)));
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "lpm",
        "install",
        "--package",
        "tool",
        "--config",
        "/tmp/lpm.toml",
        "--no-progress",
    ])
    .unwrap();
    assert_eq!(cli.package, "tool");
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/lpm.toml")));
    assert!(cli.no_progress);
}

#[test]
fn test_install_flags() {
    let cli = Cli::try_parse_from(["lpm", "install", "--force", "--skip-auto-update"]).unwrap();
    match cli.command {
        Commands::Install(cmd) => {
            assert!(cmd.force);
            assert!(cmd.skip_auto_update);
        }
        other => panic!("Expected install, got {other:?}"),
    }
}

#[test]
fn test_uninstall_keep_config() {
    let cli = Cli::try_parse_from(["lpm", "uninstall", "--keep-config"]).unwrap();
    match cli.command {
        Commands::Uninstall(cmd) => assert!(cmd.keep_config),
        other => panic!("Expected uninstall, got {other:?}"),
    }
}

#[test]
fn test_bare_clone_default_location() {
    let cli = Cli::try_parse_from(["lpm", "bare-clone", "git@example.com:o/r.git"]).unwrap();
    match cli.command {
        Commands::BareClone(cmd) => {
            assert_eq!(cmd.repository, "git@example.com:o/r.git");
            assert_eq!(cmd.location, PathBuf::from(".bare"));
        }
        other => panic!("Expected bare-clone, got {other:?}"),
    }

    let cli = Cli::try_parse_from(["lpm", "bare-clone", "repo", "--location", "repo.git"]).unwrap();
    match cli.command {
        Commands::BareClone(cmd) => assert_eq!(cmd.location, PathBuf::from("repo.git")),
        other => panic!("Expected bare-clone, got {other:?}"),
    }
}

#[test]
fn test_scripts_subcommands() {
    let cli = Cli::try_parse_from(["lpm", "scripts", "list"]).unwrap();
    assert!(matches!(cli.command, Commands::Scripts(ScriptsCommand::List)));

    let cli = Cli::try_parse_from(["lpm", "scripts", "install", "git-bare-clone", "--download"]).unwrap();
    match cli.command {
        Commands::Scripts(ScriptsCommand::Install {
            name,
            download,
        }) => {
            assert_eq!(name, "git-bare-clone");
            assert!(download);
        }
        other => panic!("Expected scripts install, got {other:?}"),
    }

    assert!(Cli::try_parse_from(["lpm", "scripts", "install"]).is_err());
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    assert!(Cli::try_parse_from(["lpm", "--verbose", "--quiet", "version"]).is_err());
}

#[test]
fn test_build_config_log_levels() {
    let cli = Cli::try_parse_from(["lpm", "version"]).unwrap();
    assert_eq!(cli.build_config().log_level.as_deref(), Some("info"));

    let cli = Cli::try_parse_from(["lpm", "-v", "version"]).unwrap();
    assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

    let cli = Cli::try_parse_from(["lpm", "-q", "version"]).unwrap();
    assert_eq!(cli.build_config().log_level.as_deref(), Some("warn"));
}

#[test]
fn test_build_config_carries_flags() {
    let cli = Cli::try_parse_from(["lpm", "--no-progress", "-c", "custom.toml", "update"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    let config = cli.build_config();
    assert!(config.no_progress);
}
