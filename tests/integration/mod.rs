//! Integration test suite for cliupdater
//!
//! End-to-end tests that drive the public [`Updater`](cliupdater::upgrade::Updater)
//! API and the `helloupdater` binary against a local mock server.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **check**: Debounced staleness checks
//! - **update**: Download, validation and installation
//! - **config**: Configuration errors raised before any network access
//! - **cli**: The `helloupdater` command
//!
//! Tests that execute a downloaded build are `#[serial]`: running a file while
//! another test still holds a write handle to it fails with `ETXTBSY`.

mod check;
mod cli;
mod config;
mod update;
