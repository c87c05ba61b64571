//! Test utilities for LPM
//!
//! Helpers shared by unit tests and the integration suite:
//! - [`init_test_logging`] wires `tracing` output into the test harness
//! - [`ArchiveBuilder`] produces gzip-compressed tar archives in memory, shaped
//!   like the release archives LPM installs
//!
//! # Example
//!
//! ```rust,no_run
//! use lpm_cli::test_utils::{ArchiveBuilder, product_json};
//!
//! let archive = ArchiveBuilder::new()
//!     .executable("Windsurf/windsurf", "#!/bin/sh\necho windsurf\n")
//!     .file("Windsurf/resources/app/product.json", &product_json("1.0.0"))
//!     .build()
//!     .unwrap();
//! assert!(!archive.is_empty());
//! ```

pub mod archive;

pub use archive::{ArchiveBuilder, product_json, windsurf_archive};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays off.
/// Safe to call from every test.
///
/// ```bash
/// RUST_LOG=lifecycle=debug,process=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
