//! Self-update protocol.
//!
//! Keeps a standalone executable in sync with a build published at
//! `{base_url}-{OSName}-{ArchName}`. The protocol has two independent entry
//! points on [`Updater`]:
//!
//! ```text
//! maybe_check_for_update (read-only)
//!    ├── check gate: skip if .B.check is younger than the interval
//!    └── version oracle: HEAD -> Last-Modified vs. mtime of B, touch .B.check
//!
//! update (mutating)
//!    ├── downloader: GET -> .B.download (truncated, owner-executable)
//!    └── installer
//!        ├── run .B.download with apply args (optional validation)
//!        ├── .B.backup = hard link to B
//!        └── rename .B.download -> B (atomic)
//! ```
//!
//! The local binary's modification time is its version: no version file, no
//! daemon, no database. The stamp, download and backup files sit next to the
//! binary so links and renames stay on one filesystem.
//!
//! # Concurrency
//!
//! Nothing runs in the background; both operations complete before returning.
//! Across processes, the rename guarantees a reader never sees a truncated
//! binary. Two updates racing are not coordinated: the last rename wins.
//!
//! # Module Structure
//!
//! - [`updater`]: the [`Updater`] facade
//! - [`version_check`]: check gate and version oracle
//! - [`download`]: the downloader
//! - [`install`]: validation, backup and atomic replace
//! - [`metadata`]: staleness verdict
//! - [`paths`]: sibling file layout
//! - [`log_sink`]: optional progress logging

pub mod download;
pub mod install;
pub mod log_sink;
pub mod metadata;
pub mod paths;
pub mod updater;
pub mod version_check;


pub use log_sink::{LogSink, NoopSink, TracingSink};
pub use metadata::Metadata;
pub use paths::SiblingPaths;
pub use updater::Updater;
pub use version_check::parse_http_date;
