//! Core types for LPM
//!
//! - [`error`] - Error types and user-friendly error reporting
//!
//! Every fallible public function returns [`anyhow::Result`]; the concrete
//! failure is an [`LpmError`] somewhere in the error chain, which
//! [`user_friendly_error`] digs out for display.

pub mod error;

pub use error::{ErrorContext, LpmError, user_friendly_error};
