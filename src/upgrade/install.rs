use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::core::UpdateError;
use crate::upgrade::log_sink::LogSink;

/// Validates a downloaded build and swaps it in for the live binary.
///
/// # Sequence
///
/// ```text
/// 1. validate   run .B.download with apply args (only if any are configured)
/// 2. unlink     remove the old .B.backup, if present
/// 3. link       hard-link B to .B.backup
/// 4. rename     .B.download -> B
/// ```
///
/// A validation failure stops before step 2, leaving the live binary, its
/// mtime and the previous backup untouched; the download stays on disk for
/// inspection. The rename is atomic on one filesystem, so a process opening
/// `B` at any point sees either the old or the new build in full.
///
/// Steps 2–4 are not retried and nothing is rolled back: if the rename fails
/// after the link succeeded, the old binary is still live, the backup link
/// exists, and the download is left in place for manual recovery.
pub struct Installer<'a> {
    pub(crate) target_path: &'a Path,
    pub(crate) download_path: &'a Path,
    pub(crate) backup_path: &'a Path,
    pub(crate) apply_args: &'a [String],
    pub(crate) sink: &'a dyn LogSink,
}

impl Installer<'_> {
    /// Validate (when configured) and install the download.
    pub async fn install(&self) -> Result<(), UpdateError> {
        self.validate().await?;
        self.replace().await
    }

    /// Run the downloaded binary with the apply arguments.
    ///
    /// The child inherits stdin, stdout and stderr.
    pub async fn validate(&self) -> Result<(), UpdateError> {
        if self.apply_args.is_empty() {
            return Ok(());
        }

        self.sink.info(&format!(
            "executing new binary with apply flags: {}",
            self.apply_args.join(" ")
        ));
        // a bare file name would be looked up on PATH
        let program = if self.download_path.components().count() == 1 {
            Path::new(".").join(self.download_path)
        } else {
            self.download_path.to_path_buf()
        };
        let status = Command::new(program)
            .args(self.apply_args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| {
                self.sink.warn("new binary could not be executed to apply update");
                UpdateError::ApplyLaunch {
                    path: self.download_path.to_path_buf(),
                    source,
                }
            })?;

        if !status.success() {
            self.sink.warn(&format!("new binary failed to apply update: {status}"));
            return Err(UpdateError::ApplyFailed { status });
        }

        self.sink.info("update applied successfully");
        Ok(())
    }

    /// Back up the live binary by hard link, then rename the download over it.
    pub async fn replace(&self) -> Result<(), UpdateError> {
        self.sink.debug(&format!(
            "linking existing exe to backup: {}",
            self.backup_path.display()
        ));
        match tokio::fs::remove_file(self.backup_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(UpdateError::io("remove old backup", self.backup_path, e)),
        }

        tokio::fs::hard_link(self.target_path, self.backup_path)
            .await
            .map_err(|e| UpdateError::io("link backup", self.backup_path, e))?;

        self.sink.info(&format!(
            "renaming downloaded file {} to final path: {}",
            self.download_path.display(),
            self.target_path.display()
        ));
        tokio::fs::rename(self.download_path, self.target_path)
            .await
            .map_err(|e| UpdateError::io("rename download onto", self.target_path, e))
    }
}
