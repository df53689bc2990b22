//! Core types shared by the updater and its command-line host.
//!
//! Currently this is the error taxonomy: [`UpdateError`] for precise handling
//! in code, and [`ErrorContext`] / [`user_friendly_error`] for terminal output.

pub mod error;

pub use error::{ErrorContext, UpdateError, user_friendly_error};
