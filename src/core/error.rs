//! Error handling for the updater.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`UpdateError`]) so callers can tell a
//!    misconfiguration from a network hiccup or a rejected update
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!    for the command-line host
//!
//! # Error Categories
//!
//! - **Configuration**: [`UpdateError::MissingBaseUrl`],
//!   [`UpdateError::InvalidCheckInterval`], [`UpdateError::UnsupportedArchitecture`],
//!   [`UpdateError::ExecutableLookup`], [`UpdateError::ConfigFile`]
//! - **I/O and network**: [`UpdateError::Io`], [`UpdateError::Request`],
//!   [`UpdateError::Status`], [`UpdateError::MissingLastModified`],
//!   [`UpdateError::InvalidLastModified`]
//! - **Validation**: [`UpdateError::ApplyFailed`], [`UpdateError::ApplyLaunch`]
//!
//! None of these are retried internally. The caller retries at the next natural
//! check interval or the next explicit update.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cliupdater::core::{UpdateError, user_friendly_error};
//!
//! let err = anyhow::Error::from(UpdateError::MissingBaseUrl);
//! let ctx = user_friendly_error(err);
//! ctx.display();
//! ```

use colored::Colorize;
use reqwest::StatusCode;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// The error type returned by every updater operation.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// No download URL prefix was configured.
    #[error("updater configuration: base_url is required")]
    MissingBaseUrl,

    /// The check interval resolved to zero.
    #[error("updater configuration: check_interval must be > 0")]
    InvalidCheckInterval,

    /// The running CPU architecture has no name on the publishing side.
    #[error("updater configuration: no published build name for architecture '{arch}'")]
    UnsupportedArchitecture {
        /// Architecture identifier as reported by the platform
        arch: String,
    },

    /// The target path was left unset and the running executable could not be located.
    #[error("updater configuration: failed to locate the running executable: {0}")]
    ExecutableLookup(#[source] std::io::Error),

    /// A configuration file could not be read or parsed.
    #[error("updater configuration: failed to load {}: {reason}", path.display())]
    ConfigFile {
        /// Path of the configuration file
        path: PathBuf,
        /// Why the file was rejected
        reason: String,
    },

    /// A file system step failed.
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        /// The step that failed, e.g. "link backup"
        operation: &'static str,
        /// Path the step operated on
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be completed.
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200 OK.
    #[error("status not 200 OK: {status} ({url})")]
    Status {
        /// Requested URL
        url: String,
        /// Status returned by the server
        status: StatusCode,
    },

    /// The HEAD response carried no `Last-Modified` header.
    #[error("response from {url} has no Last-Modified header")]
    MissingLastModified {
        /// Requested URL
        url: String,
    },

    /// The `Last-Modified` header is not an RFC 1123 date.
    #[error("invalid Last-Modified header '{value}': {source}")]
    InvalidLastModified {
        /// Raw header value
        value: String,
        /// Parse failure
        #[source]
        source: chrono::ParseError,
    },

    /// The downloaded binary ran with the apply arguments and exited unsuccessfully.
    #[error("failed to apply update: new binary exited with {status}")]
    ApplyFailed {
        /// Exit status of the validation subprocess
        status: ExitStatus,
    },

    /// The downloaded binary could not be started for validation.
    #[error("failed to apply update: could not execute {}: {source}", path.display())]
    ApplyLaunch {
        /// Path of the downloaded binary
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl UpdateError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by the configuration rather than the environment.
    ///
    /// These are raised before any file or network access and are never worth retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingBaseUrl
                | Self::InvalidCheckInterval
                | Self::UnsupportedArchitecture { .. }
                | Self::ExecutableLookup(_)
                | Self::ConfigFile { .. }
        )
    }

    /// Returns true when the downloaded binary rejected the update.
    ///
    /// A validation failure guarantees that the live binary was not replaced.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ApplyFailed { .. } | Self::ApplyLaunch { .. })
    }
}

/// An error paired with a suggestion and details for display on a terminal.
#[derive(Debug)]
pub struct ErrorContext {
    /// The error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);
        if let Some(details) = &self.details {
            eprintln!("{}", details.yellow());
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "hint".green().bold(), suggestion.green());
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(details) = &self.details {
            write!(f, "\n{details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with suggestions for known failures.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = format!("{error:#}");
    let Some(update_error) = error.downcast_ref::<UpdateError>() else {
        return ErrorContext::new(message);
    };

    match update_error {
        UpdateError::MissingBaseUrl => ErrorContext::new(message)
            .with_suggestion("Set base_url in the configuration file or pass --base-url"),
        UpdateError::UnsupportedArchitecture { .. } => ErrorContext::new(message)
            .with_details("No build is published for this CPU architecture")
            .with_suggestion("Download a build manually for this platform"),
        UpdateError::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
            ErrorContext::new(message)
                .with_details("The server has no build for this operating system and architecture")
        }
        UpdateError::ApplyFailed { .. } | UpdateError::ApplyLaunch { .. } => {
            ErrorContext::new(message)
                .with_details("The downloaded binary rejected the update; the installed binary was not replaced")
                .with_suggestion("The download was kept next to the binary for inspection")
        }
        UpdateError::Io { source, .. }
            if source.kind() == std::io::ErrorKind::PermissionDenied =>
        {
            ErrorContext::new(message).with_suggestion(
                "Check that you can write to the directory containing the binary",
            )
        }
        _ => ErrorContext::new(message),
    }
}
