use anyhow::Result;
use chrono::Utc;
use cliupdater::config::UpdaterConfig;
use cliupdater::core::UpdateError;
use cliupdater::test_utils::{DEFAULT_BUILD, UpdateFixture};
use cliupdater::upgrade::Updater;
use cliupdater::utils::Platform;
use std::time::Duration;

#[tokio::test]
async fn test_missing_base_url_is_a_configuration_error() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    fixture.publish(Utc::now(), DEFAULT_BUILD).await;
    let config = UpdaterConfig::default().with_target_path(&fixture.target_path);

    let err = Updater::new(&config).unwrap_err();

    assert!(matches!(err, UpdateError::MissingBaseUrl));
    assert!(err.is_configuration());
    assert_eq!(fixture.requests("HEAD").await + fixture.requests("GET").await, 0);
    Ok(())
}

#[tokio::test]
async fn test_unsupported_architecture_fails_before_network() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    fixture.publish(Utc::now(), DEFAULT_BUILD).await;

    let err = fixture
        .config()
        .resolve_for(&Platform::new("linux", "riscv64"), std::env::current_exe)
        .unwrap_err();

    assert!(matches!(err, UpdateError::UnsupportedArchitecture { ref arch } if arch == "riscv64"));
    assert!(err.is_configuration());
    assert_eq!(fixture.requests("HEAD").await, 0);
    Ok(())
}

#[test]
fn test_zero_interval_is_rejected() {
    let config = UpdaterConfig::new("https://downloads.example.com/tool")
        .with_target_path("/opt/tool")
        .with_check_interval(Duration::ZERO);

    assert!(matches!(
        config.resolve(),
        Err(UpdateError::InvalidCheckInterval)
    ));
}

#[test]
fn test_default_target_is_running_executable() {
    let resolved = UpdaterConfig::new("https://downloads.example.com/tool")
        .resolve_for(&Platform::new("macos", "amd64"), || {
            Ok("/usr/local/bin/tool".into())
        })
        .unwrap();

    assert_eq!(resolved.target_path(), std::path::Path::new("/usr/local/bin/tool"));
    assert_eq!(
        resolved.download_url(),
        "https://downloads.example.com/tool-Darwin-x86_64"
    );
    assert_eq!(resolved.check_interval(), Duration::from_secs(24 * 60 * 60));
}
