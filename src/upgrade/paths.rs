use std::path::{Path, PathBuf};

use crate::constants::{BACKUP_SUFFIX, CHECK_SUFFIX, DOWNLOAD_SUFFIX};

/// Auxiliary files kept next to the binary being updated.
///
/// For a target `D/B` these are the hidden siblings `D/.B.check`,
/// `D/.B.download` and `D/.B.backup`. Keeping them in the same directory puts
/// them on the same filesystem as the target, which the hard-link backup and
/// the atomic rename both rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingPaths {
    check: PathBuf,
    download: PathBuf,
    backup: PathBuf,
}

impl SiblingPaths {
    /// Compute the sibling paths for `target`.
    pub fn for_target(target: &Path) -> Self {
        let dir = target.parent().unwrap_or_else(|| Path::new(""));
        let name = target.file_name().unwrap_or_default().to_string_lossy();
        let sibling = |suffix: &str| dir.join(format!(".{name}{suffix}"));

        Self {
            check: sibling(CHECK_SUFFIX),
            download: sibling(DOWNLOAD_SUFFIX),
            backup: sibling(BACKUP_SUFFIX),
        }
    }

    /// Zero-byte stamp whose modification time is the last completed check.
    pub fn check(&self) -> &Path {
        &self.check
    }

    /// Temporary file receiving the download.
    pub fn download(&self) -> &Path {
        &self.download
    }

    /// Hard link to the previously installed binary.
    pub fn backup(&self) -> &Path {
        &self.backup
    }
}
