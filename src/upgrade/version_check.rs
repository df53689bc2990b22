use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use reqwest::header::LAST_MODIFIED;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::core::UpdateError;
use crate::upgrade::log_sink::LogSink;
use crate::upgrade::metadata::Metadata;

/// Debounced staleness check against the published build.
///
/// `VersionChecker` combines the check gate and the version oracle:
///
/// 1. The mtime of the stamp file says when the last check completed. A
///    missing stamp means "never", so the first check always goes out.
/// 2. Within `interval` of the last check nothing else happens: no stat of the
///    binary, no network.
/// 3. Otherwise a HEAD request reads `Last-Modified` from the server and
///    compares it with the target's mtime.
/// 4. Only a successful round trip refreshes the stamp, so a failed check is
///    retried next time.
///
/// The target binary is only read, never modified.
pub struct VersionChecker<'a> {
    pub(crate) client: &'a Client,
    pub(crate) url: &'a str,
    pub(crate) target_path: &'a Path,
    pub(crate) stamp_path: &'a Path,
    pub(crate) interval: Duration,
    pub(crate) sink: &'a dyn LogSink,
}

impl VersionChecker<'_> {
    /// Run the check if it is due.
    ///
    /// Returns `Ok(None)` when the last check is more recent than the interval.
    pub async fn maybe_check(&self) -> Result<Option<Metadata>, UpdateError> {
        self.sink.debug(&format!(
            "reading timestamp from check file: {} ...",
            self.stamp_path.display()
        ));
        let last_check = last_check_time(self.stamp_path).await?;

        let elapsed = Utc::now() - last_check;
        let interval = TimeDelta::from_std(self.interval).unwrap_or(TimeDelta::MAX);
        if elapsed < interval {
            self.sink.debug(&format!(
                "not checking for update; last check {last_check}; elapsed {elapsed} < interval {interval}"
            ));
            return Ok(None);
        }

        self.sink.debug(&format!(
            "checking modified time of executable path: {} ...",
            self.target_path.display()
        ));
        let local_modified = modified_time(self.target_path, "read metadata of").await?;

        self.sink.debug(&format!("checking modified time of URL: {} ...", self.url));
        let remote_modified = self.remote_last_modified().await?;

        touch_stamp(self.stamp_path).await?;

        let metadata = Metadata::new(remote_modified, local_modified);
        self.sink.debug(&format!(
            "published build modified {}; local binary modified {}; outdated: {}",
            metadata.updated_at,
            local_modified,
            metadata.outdated()
        ));
        Ok(Some(metadata))
    }

    async fn remote_last_modified(&self) -> Result<DateTime<Utc>, UpdateError> {
        let response = self
            .client
            .head(self.url)
            .send()
            .await
            .map_err(|source| UpdateError::Request {
                url: self.url.to_string(),
                source,
            })?;

        let status = response.status();
        let header = response
            .headers()
            .get(LAST_MODIFIED)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

        // HEAD responses should have no body; drain whatever arrives
        response.bytes().await.map_err(|source| UpdateError::Request {
            url: self.url.to_string(),
            source,
        })?;

        if status != StatusCode::OK {
            return Err(UpdateError::Status {
                url: self.url.to_string(),
                status,
            });
        }

        let value = header.ok_or_else(|| UpdateError::MissingLastModified {
            url: self.url.to_string(),
        })?;
        parse_http_date(&value)
    }
}

/// Format of an RFC 1123 HTTP date.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse an RFC 1123 HTTP date such as `Sun, 01 Jan 2017 12:34:56 GMT`.
///
/// Only the exact RFC 1123 form is accepted; other RFC 2822 variants (numeric
/// offsets, a missing weekday) are rejected.
pub fn parse_http_date(value: &str) -> Result<DateTime<Utc>, UpdateError> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| UpdateError::InvalidLastModified {
            value: value.to_string(),
            source,
        })
}

/// When the stamp was last touched; the Unix epoch if it does not exist.
async fn last_check_time(stamp_path: &Path) -> Result<DateTime<Utc>, UpdateError> {
    match tokio::fs::metadata(stamp_path).await {
        Ok(meta) => {
            let modified = meta
                .modified()
                .map_err(|e| UpdateError::io("read modification time of", stamp_path, e))?;
            Ok(DateTime::from(modified))
        }
        // never checked
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(DateTime::from(SystemTime::UNIX_EPOCH))
        }
        Err(e) => Err(UpdateError::io("read check stamp", stamp_path, e)),
    }
}

pub(crate) async fn modified_time(
    path: &Path,
    operation: &'static str,
) -> Result<DateTime<Utc>, UpdateError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| UpdateError::io(operation, path, e))?;
    let modified = meta
        .modified()
        .map_err(|e| UpdateError::io("read modification time of", path, e))?;
    Ok(DateTime::from(modified))
}

/// Create the stamp if needed and set its modification time to now.
async fn touch_stamp(stamp_path: &Path) -> Result<(), UpdateError> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let file = options
        .open(stamp_path)
        .await
        .map_err(|e| UpdateError::io("write check stamp", stamp_path, e))?;
    file.into_std()
        .await
        .set_modified(SystemTime::now())
        .map_err(|e| UpdateError::io("write check stamp", stamp_path, e))
}
