//! Constants shared by the update protocol.
//!
//! The sibling-file suffixes are part of the on-disk layout and must not change
//! between releases: an older binary and a newer one have to agree on where the
//! stamp, download and backup files live.

use std::time::Duration;

/// Default minimum time between two network staleness checks (24 hours).
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Suffix of the zero-byte stamp file whose mtime records the last completed check.
pub const CHECK_SUFFIX: &str = ".check";

/// Suffix of the temporary file that receives a download.
pub const DOWNLOAD_SUFFIX: &str = ".download";

/// Suffix of the hard link that preserves the previously installed binary.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Unix permissions of the download file; the owner has to be able to execute it.
pub const DOWNLOAD_MODE: u32 = 0o700;

/// Environment variable naming a TOML configuration file for `helloupdater`.
pub const CONFIG_PATH_ENV: &str = "HELLOUPDATER_CONFIG";

/// User agent sent with every HEAD and GET request.
pub fn user_agent() -> String {
    format!("cliupdater/{}", env!("CARGO_PKG_VERSION"))
}
