use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::UpdaterConfig;
use crate::upgrade::{SiblingPaths, Updater};
use crate::utils::platform::Platform;

/// Script served as the published build when a test does not care about content.
pub const DEFAULT_BUILD: &str = "#!/bin/sh\necho hello args $@\n";

/// Format a time as an RFC 1123 HTTP date.
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// A target binary in a temp directory plus a mock server publishing builds.
///
/// The fixture always resolves for Linux on x86_64, so the published build
/// lives at `/somebinary-Linux-x86_64` regardless of the host running the test.
///
/// # Example
///
/// ```rust,no_run
/// use cliupdater::test_utils::UpdateFixture;
///
/// # async fn example() -> anyhow::Result<()> {
/// let fixture = UpdateFixture::new().await?;
/// fixture.publish(chrono::Utc::now(), "#!/bin/sh\n").await;
/// let updater = fixture.updater(&fixture.config())?;
/// updater.update().await?;
/// # Ok(())
/// # }
/// ```
pub struct UpdateFixture {
    pub temp_dir: TempDir,
    pub server: MockServer,
    pub target_path: PathBuf,
}

impl UpdateFixture {
    /// Start a mock server and create an empty target binary.
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        let target_path = temp_dir.path().join("somebinary");
        tokio::fs::write(&target_path, b"")
            .await
            .context("Failed to create target binary")?;

        Ok(Self {
            temp_dir,
            server: MockServer::start().await,
            target_path,
        })
    }

    pub fn platform() -> Platform {
        Platform::new("linux", "x86_64")
    }

    pub fn base_url(&self) -> String {
        format!("{}/somebinary", self.server.uri())
    }

    /// Server path of the build published for [`platform`](Self::platform).
    pub fn build_path() -> &'static str {
        "/somebinary-Linux-x86_64"
    }

    /// Config pointing at the mock server and the fixture's target.
    pub fn config(&self) -> UpdaterConfig {
        UpdaterConfig::new(self.base_url()).with_target_path(&self.target_path)
    }

    pub fn updater(&self, config: &UpdaterConfig) -> Result<Updater> {
        let resolved = config.resolve_for(&Self::platform(), std::env::current_exe)?;
        Ok(Updater::from_resolved(resolved)?)
    }

    pub fn paths(&self) -> SiblingPaths {
        SiblingPaths::for_target(&self.target_path)
    }

    /// Serve `body` as the published build, last modified at `modified`.
    ///
    /// Replaces whatever was published before and clears the request log.
    pub async fn publish(&self, modified: DateTime<Utc>, body: &str) {
        self.server.reset().await;
        Mock::given(method("HEAD"))
            .and(path(Self::build_path()))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Last-Modified", http_date(modified).as_str()),
            )
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path(Self::build_path()))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Answer every request for the build with `status` and no body.
    pub async fn fail_with(&self, status: u16) {
        self.server.reset().await;
        Mock::given(path(Self::build_path()))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server received with the given method.
    pub async fn requests(&self, http_method: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.method.as_str() == http_method)
            .count()
    }

    pub async fn read_target(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.target_path)
            .await
            .context("Failed to read target binary")
    }
}

/// Set the modification time of an existing file.
pub fn set_mtime(path: &Path, time: DateTime<Utc>) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.set_modified(SystemTime::from(time))
        .with_context(|| format!("Failed to set mtime of {}", path.display()))
}
