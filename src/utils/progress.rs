//! Progress indicators for downloads and long-running steps
//!
//! Wraps `indicatif` with LPM styling. A download whose size is known gets a
//! byte progress bar; anything else gets a spinner.
//!
//! # Environment Variables
//!
//! - `LPM_NO_PROGRESS`: Set to any value to disable all progress indicators
//!   (`--no-progress` sets it for the current process)
//!
//! # Examples
//!
//! ```rust
//! use lpm_cli::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new_download(2048);
//! progress.set_message("Downloading windsurf");
//! progress.inc(1024);
//! progress.inc(1024);
//! progress.finish_and_clear();
//! ```
//!
//! ```rust
//! use lpm_cli::utils::progress::ProgressBar;
//!
//! let spinner = ProgressBar::new_spinner();
//! spinner.set_message("Querying latest version...");
//! spinner.finish_and_clear();
//! ```

use crate::constants::NO_PROGRESS_ENV;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Checks if progress bars should be disabled.
///
/// Progress bars are disabled when the `LPM_NO_PROGRESS` environment variable
/// is set to any value.
fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

/// A progress bar with consistent styling.
///
/// When progress is disabled this wraps a hidden `indicatif` bar that silently
/// ignores every call, so callers never need to check the setting themselves.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a byte progress bar for a transfer of `total_bytes`.
    ///
    /// Shows bytes transferred, total size, transfer rate and ETA.
    pub fn new_download(total_bytes: u64) -> Self {
        Self::styled(IndicatifBar::new(total_bytes), download_style())
    }

    /// Creates a spinner for work of unknown size.
    ///
    /// The spinner ticks every 100ms until finished.
    pub fn new_spinner() -> Self {
        if is_progress_disabled() {
            return Self {
                inner: IndicatifBar::hidden(),
            };
        }
        let bar = IndicatifBar::new_spinner();
        bar.set_style(spinner_style());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            inner: bar,
        }
    }

    /// Creates a byte bar when the length is known, a spinner otherwise.
    pub fn for_transfer(content_length: Option<u64>) -> Self {
        match content_length {
            Some(len) if len > 0 => Self::new_download(len),
            _ => Self::new_spinner(),
        }
    }

    fn styled(bar: IndicatifBar, style: IndicatifStyle) -> Self {
        if is_progress_disabled() {
            return Self {
                inner: IndicatifBar::hidden(),
            };
        }
        bar.set_style(style);
        Self {
            inner: bar,
        }
    }

    /// Sets the message displayed next to the bar.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Advances the position by `delta`.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Finishes the bar and removes it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

fn download_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template(
            "[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}",
        )
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg} {bytes}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}
