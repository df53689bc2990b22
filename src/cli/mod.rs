//! Command-line interface for `helloupdater`.
//!
//! `helloupdater` is the smallest useful host for the updater: it greets, then
//! either installs the published build (`--update`) or runs the debounced
//! staleness check and nags when the local binary is behind.
//!
//! # Examples
//!
//! ```bash
//! helloupdater                       # greet, check at most once a day
//! helloupdater --verbose             # same, with updater progress on stderr
//! helloupdater --update              # download and install the published build
//! helloupdater --nocheck             # greet only
//! helloupdater --config updater.toml --update
//! ```
//!
//! Check failures are warnings: the program still exits 0. Update failures
//! exit 1.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::UpdaterConfig;
use crate::constants::CONFIG_PATH_ENV;
use crate::upgrade::{Metadata, TracingSink, Updater};

/// Where builds of `helloupdater` are published when no config says otherwise.
pub const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com/cliupdater/helloupdater";

/// Command-line arguments for `helloupdater`.
#[derive(Parser, Debug)]
#[command(name = "helloupdater", version, about = "Demonstrates a self-updating command")]
pub struct Cli {
    /// Log updater progress to stderr.
    #[arg(long)]
    pub verbose: bool,

    /// Download and install the published build.
    #[arg(long, conflicts_with = "nocheck")]
    pub update: bool,

    /// Do not check for updates.
    #[arg(long)]
    pub nocheck: bool,

    /// Exit successfully without doing anything else.
    ///
    /// Intended as an apply argument: a freshly downloaded build run with
    /// `--self-test` proves it starts on this machine.
    #[arg(long)]
    pub self_test: bool,

    /// TOML file with updater settings.
    #[arg(long, env = CONFIG_PATH_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the download URL prefix.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Binary to keep up to date instead of this executable.
    #[arg(long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Argument passed to the downloaded build before installing it; repeatable.
    #[arg(long = "apply-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub apply_args: Vec<String>,
}

impl Cli {
    /// Run the command.
    pub async fn execute(self) -> Result<()> {
        if self.self_test {
            println!("helloupdater {} self-test ok", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        self.init_logging();
        println!("hello updater main()");

        if !self.update && self.nocheck {
            return Ok(());
        }

        if self.update {
            self.updater().await?.update().await?;
            println!("{}", "Updated to the latest published build".green());
            return Ok(());
        }

        match self.check().await {
            Ok(Some(metadata)) if metadata.outdated() => {
                eprintln!(
                    "{} run with --update to update; your version is {} days old",
                    "UPDATE:".cyan().bold(),
                    metadata.days_old()
                );
            }
            Ok(_) => debug!("no update needed"),
            // configuration problems land here too: checking is best effort
            Err(e) => {
                eprintln!("{} failed to check for update: {e:#}", "Warning:".yellow());
            }
        }
        Ok(())
    }

    async fn check(&self) -> Result<Option<Metadata>> {
        Ok(self.updater().await?.maybe_check_for_update().await?)
    }

    async fn updater(&self) -> Result<Updater> {
        let config = self.build_config().await?;
        let mut updater = Updater::new(&config)?;
        if self.verbose {
            updater = updater.with_log_sink(Arc::new(TracingSink));
        }
        debug!(
            "updating {} from {}",
            updater.config().target_path().display(),
            updater.config().download_url()
        );
        Ok(updater)
    }

    /// Merge the config file (if any) with command-line overrides.
    pub async fn build_config(&self) -> Result<UpdaterConfig> {
        let mut config = match &self.config {
            Some(path) => UpdaterConfig::load_from(path).await?,
            None => UpdaterConfig::new(DEFAULT_BASE_URL),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(target) = &self.target {
            config.target_path = Some(target.clone());
        }
        if !self.apply_args.is_empty() {
            config.apply_args = self.apply_args.clone();
        }
        Ok(config)
    }

    fn init_logging(&self) {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}
