//! Updater configuration.
//!
//! Configuration comes in two shapes:
//!
//! - [`UpdaterConfig`] is what callers write: possibly partial, serde-loadable
//!   from TOML, owned by the caller.
//! - [`ResolvedConfig`] is what the updater runs with: every default filled in,
//!   validated, immutable.
//!
//! [`UpdaterConfig::resolve`] is the only way to get from one to the other. It is
//! pure: it never mutates the caller's value, and resolving the same config twice
//! yields equal results.
//!
//! # File Format
//!
//! ```toml
//! base_url = "https://storage.example.com/releases/helloupdater"
//! # Optional; defaults to the running executable
//! target_path = "/usr/local/bin/helloupdater"
//! # Seconds between network checks; defaults to 86400
//! check_interval = 3600
//! # Run the new binary with these arguments before installing it
//! apply_args = ["--self-test"]
//! ```

mod updater;

pub use updater::{ResolvedConfig, UpdaterConfig};
