use reqwest::{Client, StatusCode};
use std::path::Path;
use tokio::io::AsyncWriteExt;

#[cfg(unix)]
use crate::constants::DOWNLOAD_MODE;
use crate::core::UpdateError;
use crate::upgrade::log_sink::LogSink;

/// Fetches the published build into the `.download` sibling of the target.
///
/// The file is truncated first, so a partial file left by an interrupted
/// attempt is simply overwritten. On Unix it is created owner-executable so the
/// installer can run it for validation. Nothing here touches the live binary.
pub struct Downloader<'a> {
    pub(crate) client: &'a Client,
    pub(crate) url: &'a str,
    pub(crate) download_path: &'a Path,
    pub(crate) sink: &'a dyn LogSink,
}

impl Downloader<'_> {
    /// Download the full build.
    ///
    /// # Errors
    ///
    /// Fails on a non-200 status, a transport error while streaming, or any
    /// failure opening, writing or closing the download file.
    pub async fn download(&self) -> Result<u64, UpdateError> {
        let path = self.download_path;
        self.sink.debug(&format!("opening update file {}", path.display()));

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(DOWNLOAD_MODE);
        let mut file = options
            .open(path)
            .await
            .map_err(|e| UpdateError::io("open download file", path, e))?;

        self.sink.info(&format!("downloading update from {}", self.url));
        let request_error = |source| UpdateError::Request {
            url: self.url.to_string(),
            source,
        };
        let mut response = self.client.get(self.url).send().await.map_err(request_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpdateError::Status {
                url: self.url.to_string(),
                status,
            });
        }

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(request_error)? {
            file.write_all(&chunk)
                .await
                .map_err(|e| UpdateError::io("write download file", path, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| UpdateError::io("write download file", path, e))?;
        file.sync_all()
            .await
            .map_err(|e| UpdateError::io("close download file", path, e))?;
        drop(file);

        self.sink.debug(&format!("downloaded {written} bytes to {}", path.display()));
        Ok(written)
    }
}
