//! Error handling for LPM
//!
//! This module provides the error taxonomy for the package lifecycle manager and the
//! user-facing error reporting used by the `lpm` binary. The error system follows two
//! principles:
//! 1. **Strongly-typed errors** so callers (and tests) can match on the failure kind
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Remote**: [`LpmError::NetworkError`], [`LpmError::MalformedResponse`]
//! - **Archive handling**: [`LpmError::ExtractionError`]
//! - **File System**: [`LpmError::FileSystemError`], [`LpmError::IoError`]
//! - **Lifecycle preconditions**: [`LpmError::AlreadyInstalled`],
//!   [`LpmError::NotInstalled`], [`LpmError::MetadataMissing`]
//! - **External processes**: [`LpmError::CommandFailed`], [`LpmError::CommandNotFound`],
//!   [`LpmError::CommandTimeout`]
//! - **Configuration**: [`LpmError::ConfigError`], [`LpmError::UnknownPackage`],
//!   [`LpmError::UnknownScript`]
//!
//! Every error aborts the current operation. Advisory failures (for example a
//! systemd timer that could not be enabled) are not errors at all; they are reported
//! through [`crate::lifecycle::StepOutcome`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use lpm_cli::core::{LpmError, user_friendly_error};
//!
//! let error = LpmError::NotInstalled {
//!     package: "windsurf".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with a suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for LPM operations.
///
/// Each variant names one failure mode of the lifecycle manager or of the
/// helper commands. Messages are written for end users; the kind of failure
/// is always distinguishable from the message alone.
#[derive(Error, Debug)]
pub enum LpmError {
    /// Transport failure or non-success HTTP status.
    ///
    /// Raised by the version source and by the archive fetcher. Terminal, never
    /// retried.
    #[error("Network error while fetching {url}: {reason}")]
    NetworkError {
        /// The URL that was requested
        url: String,
        /// Transport error or HTTP status description
        reason: String,
    },

    /// The remote version payload did not contain an expected field.
    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse {
        /// The version endpoint URL
        url: String,
        /// Which field was missing or why the payload was rejected
        reason: String,
    },

    /// The archive tool exited with a nonzero status.
    #[error("Failed to extract archive {archive}")]
    ExtractionError {
        /// Path of the archive that failed to extract
        archive: String,
        /// Output of the archive tool
        reason: String,
    },

    /// A file system operation failed while installing or removing files.
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// The operation that failed (e.g., "copy", "remove", "rename")
        operation: String,
        /// The path involved
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// `install` was called for a package that is already installed, without `--force`.
    #[error("Package '{package}' is already installed at {path}")]
    AlreadyInstalled {
        /// Package name
        package: String,
        /// Install directory that already exists
        path: String,
    },

    /// `update` was called for a package that is not installed.
    #[error("Package '{package}' is not installed")]
    NotInstalled {
        /// Package name
        package: String,
    },

    /// The install directory exists but the package metadata file does not.
    #[error("Installed package '{package}' has no version metadata at {path}")]
    MetadataMissing {
        /// Package name
        package: String,
        /// Expected metadata file location
        path: String,
    },

    /// An external command returned a non-zero exit status.
    #[error("Command '{program} {operation}' failed")]
    CommandFailed {
        /// The program that was run (e.g., "tar", "git", "systemctl")
        program: String,
        /// The first argument(s), identifying the operation
        operation: String,
        /// The error output of the command
        stderr: String,
    },

    /// An external command could not be found in PATH.
    #[error("'{program}' is not installed or not found in PATH")]
    CommandNotFound {
        /// The missing program
        program: String,
    },

    /// An external command did not finish within its timeout.
    #[error("Command '{program} {operation}' timed out after {seconds} seconds")]
    CommandTimeout {
        /// The program that was run
        program: String,
        /// The operation that timed out
        operation: String,
        /// The timeout that elapsed
        seconds: u64,
    },

    /// Configuration file could not be loaded or is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// No package spec with the requested name exists.
    #[error("Unknown package '{name}'")]
    UnknownPackage {
        /// The requested package name
        name: String,
        /// Names of the packages that are configured
        available: Vec<String>,
    },

    /// No script with the requested name is in the catalog.
    #[error("Unknown script name '{name}'")]
    UnknownScript {
        /// The requested script name
        name: String,
        /// Names of the scripts in the catalog
        available: Vec<String>,
        /// Closest catalog entry, if any is similar enough
        suggestion: Option<String>,
    },

    /// IO error from the standard library
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for LpmError {
    fn clone(&self) -> Self {
        match self {
            Self::NetworkError {
                url,
                reason,
            } => Self::NetworkError {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::MalformedResponse {
                url,
                reason,
            } => Self::MalformedResponse {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::ExtractionError {
                archive,
                reason,
            } => Self::ExtractionError {
                archive: archive.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
                reason,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::AlreadyInstalled {
                package,
                path,
            } => Self::AlreadyInstalled {
                package: package.clone(),
                path: path.clone(),
            },
            Self::NotInstalled {
                package,
            } => Self::NotInstalled {
                package: package.clone(),
            },
            Self::MetadataMissing {
                package,
                path,
            } => Self::MetadataMissing {
                package: package.clone(),
                path: path.clone(),
            },
            Self::CommandFailed {
                program,
                operation,
                stderr,
            } => Self::CommandFailed {
                program: program.clone(),
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::CommandNotFound {
                program,
            } => Self::CommandNotFound {
                program: program.clone(),
            },
            Self::CommandTimeout {
                program,
                operation,
                seconds,
            } => Self::CommandTimeout {
                program: program.clone(),
                operation: operation.clone(),
                seconds: *seconds,
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::UnknownPackage {
                name,
                available,
            } => Self::UnknownPackage {
                name: name.clone(),
                available: available.clone(),
            },
            Self::UnknownScript {
                name,
                available,
                suggestion,
            } => Self::UnknownScript {
                name: name.clone(),
                available: available.clone(),
                suggestion: suggestion.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// An error paired with optional details and a suggestion for the user.
///
/// This is what the `lpm` binary prints when a command fails:
/// - Error message: red and bold
/// - Details: yellow
/// - Suggestion: green
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying LPM error
    pub error: LpmError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: LpmError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`LpmError`] anywhere in the error chain, then [`std::io::Error`],
/// [`toml::de::Error`] and [`reqwest::Error`]. Anything else is reported with its
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(lpm_error) = error.chain().find_map(|cause| cause.downcast_ref::<LpmError>()) {
        let mut ctx = create_error_context(lpm_error.clone());
        // Keep the outer context messages, they say what was being attempted
        let outer: Vec<String> = error
            .chain()
            .take_while(|cause| cause.downcast_ref::<LpmError>().is_none())
            .map(std::string::ToString::to_string)
            .collect();
        if !outer.is_empty() && ctx.details.is_none() {
            ctx.details = Some(outer.join(": "));
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(LpmError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check ownership and permissions of the install, bin and config directories")
                .with_details("LPM only writes inside your home directory and never needs elevated permissions");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(LpmError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(LpmError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your lpm config file (~/.lpm/config.toml)");
    }

    if let Some(http_error) = error.downcast_ref::<reqwest::Error>() {
        let url = http_error.url().map(ToString::to_string).unwrap_or_else(|| "unknown".to_string());
        return create_error_context(LpmError::NetworkError {
            url,
            reason: http_error.to_string(),
        });
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(LpmError::Other {
        message,
    })
}

/// Map each [`LpmError`] variant to a context with tailored suggestions.
fn create_error_context(error: LpmError) -> ErrorContext {
    match &error {
        LpmError::NetworkError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check your internet connection and that the update server is reachable, then try again")
                .with_details(details)
        }

        LpmError::MalformedResponse { .. } => ErrorContext::new(error)
            .with_suggestion("The version endpoint may have changed format. Check `version_field`/`url_field` in your package configuration")
            .with_details("The version endpoint must return a JSON object containing a version string and a download URL"),

        LpmError::ExtractionError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("The download may be corrupted or not a gzip-compressed tar archive. Try again later")
                .with_details(details)
        }

        LpmError::FileSystemError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check free disk space and permissions on the target directory")
                .with_details(details)
        }

        LpmError::AlreadyInstalled { .. } => ErrorContext::new(error)
            .with_suggestion("Use `lpm install --force` to reinstall, or `lpm update` to upgrade in place"),

        LpmError::NotInstalled { package } => {
            let suggestion = format!("Run `lpm --package {package} install` first");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        LpmError::MetadataMissing { package, .. } => {
            let suggestion = format!("The installation looks incomplete. Reinstall with `lpm --package {package} install --force`");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        LpmError::CommandFailed { program, stderr, .. } => {
            let suggestion = format!("Try running the {program} command manually for more details");
            let details = stderr.trim().to_string();
            let ctx = ErrorContext::new(error).with_suggestion(suggestion);
            if details.is_empty() {
                ctx
            } else {
                ctx.with_details(details)
            }
        }

        LpmError::CommandNotFound { program } => {
            let suggestion = format!("Install {program} with your system package manager and make sure it is in PATH");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        LpmError::CommandTimeout { .. } => ErrorContext::new(error)
            .with_suggestion("Check your network connection and try again")
            .with_details("External commands are stopped when they exceed their timeout"),

        LpmError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check your lpm config file (~/.lpm/config.toml or the path given with --config)"),

        LpmError::UnknownPackage { available, .. } => {
            let details = format!("Configured packages: {}", available.join(", "));
            ErrorContext::new(error)
                .with_suggestion("Add a [packages.<name>] section to your lpm config, or pick a configured package")
                .with_details(details)
        }

        LpmError::UnknownScript { available, suggestion, .. } => {
            let details = format!(
                "Available scripts for installation:\n{}",
                available.iter().map(|name| format!("  - {name}")).collect::<Vec<_>>().join("\n")
            );
            let ctx = ErrorContext::new(error.clone()).with_details(details);
            match suggestion {
                Some(close) => ctx.with_suggestion(format!("Did you mean '{close}'?")),
                None => ctx.with_suggestion("Run `lpm scripts list` to see available scripts"),
            }
        }

        _ => ErrorContext::new(error),
    }
}
