//! Cross-platform utilities.
//!
//! # Modules
//!
//! - [`platform`] - Operating system and architecture naming for published builds

pub mod platform;

pub use platform::Platform;
