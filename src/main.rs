//! helloupdater entry point
//!
//! A small host program that keeps itself up to date: on every run it checks
//! (at most once a day) whether a newer build is published, and `--update`
//! installs it.

use anyhow::Result;
use clap::Parser;
use cliupdater::cli;
use cliupdater::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
