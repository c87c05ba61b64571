//! Package lifecycle: install, update, uninstall and version
//!
//! Components, leaf to root:
//!
//! - [`HttpVersionSource`] asks the release endpoint for the latest version
//! - [`ArchiveFetcher`] streams the archive to a staging file
//! - [`ArchiveInstaller`] extracts it and swaps it in as the install directory
//! - [`LifecycleManager`] runs the operations and provisions the launcher,
//!   desktop entry, update command and update timer around the install
//!
//! Calls only flow downward; no component knows about the one above it.

mod archive;
mod artifacts;
mod fetcher;
mod http;
mod installed;
mod manager;
mod report;
mod scheduler;
mod version_source;

pub use archive::ArchiveInstaller;
pub use artifacts::{ArtifactRenderer, UpdateCommand};
pub use fetcher::ArchiveFetcher;
pub use http::build_client;
pub use installed::{InstalledPackage, Metadata};
pub use manager::LifecycleManager;
pub use report::{
    Advisory, Artifact, InstallReport, Step, StepOutcome, UninstallReport, UpdateReport,
    VersionReport,
};
pub use scheduler::UpdateScheduler;
pub use version_source::{HttpVersionSource, VersionDescriptor};
