//! Platform naming for published builds.
//!
//! Builds are published under names derived from `uname`: the operating system is
//! title-cased (`Linux`, `Darwin`) and the architecture is translated through a
//! fixed table to the name the publishing side uses (`x86_64`). The download URL
//! for a platform is
//!
//! ```text
//! {base_url}-{OSName}-{ArchName}
//! ```
//!
//! # Examples
//!
//! ```rust
//! use cliupdater::utils::platform::Platform;
//!
//! let platform = Platform::new("linux", "x86_64");
//! assert_eq!(platform.os_name(), "Linux");
//! assert_eq!(platform.arch_name(), Some("x86_64"));
//! ```

use crate::core::UpdateError;

/// Architecture identifiers and the names builds are published under.
const ARCH_NAMES: &[(&str, &str)] = &[("x86_64", "x86_64"), ("amd64", "x86_64")];

/// The operating system and CPU architecture a build is selected for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os: String,
    arch: String,
}

impl Platform {
    /// Create a platform from raw identifiers, e.g. `("linux", "x86_64")`.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Title-cased `uname -s` style name of the operating system.
    pub fn os_name(&self) -> String {
        // Rust calls it "macos"; uname and the publishing side say "Darwin"
        let os = if self.os == "macos" {
            "darwin"
        } else {
            &self.os
        };
        title_case(os)
    }

    /// Published name of the architecture, or `None` when no build exists for it.
    pub fn arch_name(&self) -> Option<&'static str> {
        ARCH_NAMES
            .iter()
            .find(|(arch, _)| *arch == self.arch)
            .map(|(_, name)| *name)
    }

    /// Build the download URL for this platform.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::UnsupportedArchitecture`] when the architecture has
    /// no published name.
    pub fn download_url(&self, base_url: &str) -> Result<String, UpdateError> {
        let arch = self
            .arch_name()
            .ok_or_else(|| UpdateError::UnsupportedArchitecture {
                arch: self.arch.clone(),
            })?;
        Ok(format!("{base_url}-{}-{arch}", self.os_name()))
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
