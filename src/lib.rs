//! cliupdater - keep a standalone executable up to date
//!
//! A binary built with this crate can check whether a newer build of itself has
//! been published at a known URL and, when asked, replace itself with that build.
//!
//! # Architecture Overview
//!
//! - A **check gate** keeps network checks to at most one per interval, using the
//!   mtime of a hidden stamp file next to the binary.
//! - A **version oracle** sends a HEAD request and compares `Last-Modified` with
//!   the binary's own mtime.
//! - A **downloader** fetches the build into a hidden sibling file.
//! - An **installer** optionally runs the download as a self-test, hard-links the
//!   current binary to a backup and renames the download over it.
//!
//! # Core Modules
//!
//! - [`config`] - Partial and resolved updater configuration, TOML loading
//! - [`core`] - Error types and user-facing error reporting
//! - [`upgrade`] - The update protocol and the [`Updater`](upgrade::Updater) facade
//! - [`utils`] - Platform naming for published builds
//! - [`cli`] - The `helloupdater` demonstration command
//!
//! # Example
//!
//! ```rust,no_run
//! use cliupdater::config::UpdaterConfig;
//! use cliupdater::upgrade::Updater;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let updater = Updater::new(&UpdaterConfig::new("https://downloads.example.com/mytool"))?;
//! match updater.maybe_check_for_update().await {
//!     Ok(Some(metadata)) if metadata.outdated() => {
//!         eprintln!("your version is {} days old", metadata.days_old());
//!     }
//!     Ok(_) => {}
//!     Err(e) => eprintln!("Warning: failed to check for update: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod upgrade;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
