//! External process execution
//!
//! See [`ProcessCommand`] for the builder every `tar`, `git` and `systemctl`
//! invocation goes through.

pub mod command_builder;

pub use command_builder::{ProcessCommand, ProcessOutput};
