//! Integration test suite for LPM
//!
//! Drives the `lpm` binary end to end against a mock release server inside a
//! temporary home directory.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **cli**: help, version and argument errors
//! - **lifecycle**: install, update and uninstall
//! - **version**: the `version` command in every installed state
//! - **scripts**: script wrapper listing and installation
//! - **errors**: exit codes and messages of failing commands

#[path = "../common/mod.rs"]
mod common;

mod cli;
#[cfg(unix)]
mod errors;
#[cfg(unix)]
mod lifecycle;
#[cfg(unix)]
mod scripts;
#[cfg(unix)]
mod version;
