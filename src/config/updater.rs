use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::DEFAULT_CHECK_INTERVAL;
use crate::core::UpdateError;
use crate::utils::platform::Platform;

/// Caller-supplied updater settings; any field may be left unset.
///
/// # Examples
///
/// ```rust
/// use cliupdater::config::UpdaterConfig;
/// use std::time::Duration;
///
/// let config = UpdaterConfig::new("https://example.com/helloupdater")
///     .with_target_path("/usr/local/bin/helloupdater")
///     .with_check_interval(Duration::from_secs(3600))
///     .with_apply_args(["--self-test"]);
/// assert_eq!(config.apply_args, vec!["--self-test".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Download URL prefix; the platform suffix `-{OS}-{Arch}` is appended to it.
    #[serde(default)]
    pub base_url: String,

    /// Binary to keep up to date. Defaults to the running executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<PathBuf>,

    /// Minimum time between network checks. Defaults to 24 hours; zero is rejected.
    #[serde(default, with = "duration_secs", skip_serializing_if = "Option::is_none")]
    pub check_interval: Option<Duration>,

    /// Arguments the downloaded binary is run with before it is installed.
    ///
    /// Empty means no validation step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apply_args: Vec<String>,
}

impl UpdaterConfig {
    /// Create a config with only the base URL set.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the binary to keep up to date.
    pub fn with_target_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_path = Some(path.into());
        self
    }

    /// Set the minimum time between network checks.
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = Some(interval);
        self
    }

    /// Set the validation arguments for downloaded binaries.
    pub fn with_apply_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Load a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::ConfigFile`] when the file cannot be read or is not
    /// valid TOML for this structure.
    pub async fn load_from(path: &Path) -> Result<Self, UpdateError> {
        debug!("Loading updater config from {}", path.display());
        let content =
            tokio::fs::read_to_string(path).await.map_err(|e| UpdateError::ConfigFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        toml::from_str(&content).map_err(|e| UpdateError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Resolve against the running platform and executable.
    ///
    /// # Errors
    ///
    /// See [`resolve_for`](Self::resolve_for).
    pub fn resolve(&self) -> Result<ResolvedConfig, UpdateError> {
        self.resolve_for(&Platform::current(), std::env::current_exe)
    }

    /// Fill in defaults and validate.
    ///
    /// `locate_exe` is only called when `target_path` is unset.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::MissingBaseUrl`] if `base_url` is empty
    /// - [`UpdateError::InvalidCheckInterval`] if `check_interval` is zero
    /// - [`UpdateError::UnsupportedArchitecture`] if `platform` has no published build name
    /// - [`UpdateError::ExecutableLookup`] if `locate_exe` fails
    pub fn resolve_for<F>(
        &self,
        platform: &Platform,
        locate_exe: F,
    ) -> Result<ResolvedConfig, UpdateError>
    where
        F: FnOnce() -> std::io::Result<PathBuf>,
    {
        if self.base_url.is_empty() {
            return Err(UpdateError::MissingBaseUrl);
        }

        let check_interval = self.check_interval.unwrap_or(DEFAULT_CHECK_INTERVAL);
        if check_interval.is_zero() {
            return Err(UpdateError::InvalidCheckInterval);
        }

        let download_url = platform.download_url(&self.base_url)?;

        let target_path = match &self.target_path {
            Some(path) => path.clone(),
            None => locate_exe().map_err(UpdateError::ExecutableLookup)?,
        };

        Ok(ResolvedConfig {
            base_url: self.base_url.clone(),
            target_path,
            check_interval,
            apply_args: self.apply_args.clone(),
            download_url,
        })
    }
}

/// Fully-resolved, immutable updater settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    base_url: String,
    target_path: PathBuf,
    check_interval: Duration,
    apply_args: Vec<String>,
    download_url: String,
}

impl ResolvedConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    pub fn apply_args(&self) -> &[String] {
        &self.apply_args
    }

    /// `{base_url}-{OSName}-{ArchName}` for the platform this config was resolved for.
    pub fn download_url(&self) -> &str {
        &self.download_url
    }
}

/// `Option<Duration>` stored as whole seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
