use reqwest::Client;
use std::fmt;
use std::sync::Arc;

use crate::config::{ResolvedConfig, UpdaterConfig};
use crate::constants::user_agent;
use crate::core::UpdateError;
use crate::upgrade::download::Downloader;
use crate::upgrade::install::Installer;
use crate::upgrade::log_sink::{LogSink, NoopSink};
use crate::upgrade::metadata::Metadata;
use crate::upgrade::paths::SiblingPaths;
use crate::upgrade::version_check::VersionChecker;

/// Keeps one binary up to date with the build published for this platform.
///
/// `Updater` exposes the two independent entry points of the update protocol:
///
/// - [`maybe_check_for_update`](Self::maybe_check_for_update): read-only,
///   debounced staleness check
/// - [`update`](Self::update): download, optional validation, atomic install
///
/// A host may call either without the other. Each call runs to completion on
/// the caller's task; nothing is spawned in the background.
///
/// # Examples
///
/// ```rust,no_run
/// use cliupdater::config::UpdaterConfig;
/// use cliupdater::upgrade::{TracingSink, Updater};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = UpdaterConfig::new("https://storage.example.com/helloupdater");
/// let updater = Updater::new(&config)?.with_log_sink(Arc::new(TracingSink));
///
/// if let Some(metadata) = updater.maybe_check_for_update().await? {
///     if metadata.outdated() {
///         println!("{} days behind; updating", metadata.days_old());
///         updater.update().await?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct Updater {
    config: ResolvedConfig,
    paths: SiblingPaths,
    client: Client,
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater")
            .field("config", &self.config)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl Updater {
    /// Resolve `config` against the running platform and executable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error from [`UpdaterConfig::resolve`], or
    /// [`UpdateError::Request`] if the HTTP client cannot be initialized.
    pub fn new(config: &UpdaterConfig) -> Result<Self, UpdateError> {
        Self::from_resolved(config.resolve()?)
    }

    /// Build an updater from an already-resolved configuration.
    pub fn from_resolved(config: ResolvedConfig) -> Result<Self, UpdateError> {
        let client = Client::builder()
            .user_agent(user_agent())
            .build()
            .map_err(|source| UpdateError::Request {
                url: config.download_url().to_string(),
                source,
            })?;

        Ok(Self {
            paths: SiblingPaths::for_target(config.target_path()),
            config,
            client,
            sink: Arc::new(NoopSink),
        })
    }

    /// Send progress messages to `sink` instead of discarding them.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The stamp, download and backup files next to the target.
    pub fn paths(&self) -> &SiblingPaths {
        &self.paths
    }

    /// Check for a newer build if the check interval has elapsed.
    ///
    /// Returns `Ok(None)` without touching the network when the last completed
    /// check is more recent than the interval.
    ///
    /// # Errors
    ///
    /// Any failure to stat the stamp (other than it not existing) or the target,
    /// a failed or non-200 HEAD request, or a missing/malformed `Last-Modified`
    /// header. The stamp is left unchanged on error.
    pub async fn maybe_check_for_update(&self) -> Result<Option<Metadata>, UpdateError> {
        VersionChecker {
            client: &self.client,
            url: self.config.download_url(),
            target_path: self.config.target_path(),
            stamp_path: self.paths.check(),
            interval: self.config.check_interval(),
            sink: self.sink.as_ref(),
        }
        .maybe_check()
        .await
    }

    /// Download the published build and install it over the target.
    ///
    /// # Errors
    ///
    /// Download failures leave the live binary untouched. A validation failure
    /// ([`UpdateError::is_validation`]) guarantees no replacement happened. Errors
    /// from the backup or rename steps are returned as-is with no rollback.
    pub async fn update(&self) -> Result<(), UpdateError> {
        Downloader {
            client: &self.client,
            url: self.config.download_url(),
            download_path: self.paths.download(),
            sink: self.sink.as_ref(),
        }
        .download()
        .await?;

        Installer {
            target_path: self.config.target_path(),
            download_path: self.paths.download(),
            backup_path: self.paths.backup(),
            apply_args: self.config.apply_args(),
            sink: self.sink.as_ref(),
        }
        .install()
        .await
    }
}
