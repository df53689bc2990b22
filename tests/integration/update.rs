use anyhow::Result;
use chrono::Utc;
use cliupdater::core::UpdateError;
use cliupdater::test_utils::{DEFAULT_BUILD, MemorySink, UpdateFixture};
use serial_test::serial;
use std::sync::Arc;
use tracing::Level;

#[tokio::test]
async fn test_update_replaces_target_and_keeps_backup() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    tokio::fs::write(&fixture.target_path, b"old build").await?;
    fixture.publish(Utc::now(), DEFAULT_BUILD).await;

    fixture.updater(&fixture.config())?.update().await?;

    assert_eq!(fixture.read_target().await?, DEFAULT_BUILD.as_bytes());
    assert_eq!(tokio::fs::read(fixture.paths().backup()).await?, b"old build");
    assert!(!fixture.paths().download().exists());
    Ok(())
}

#[tokio::test]
async fn test_update_twice_is_idempotent() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    fixture.publish(Utc::now(), DEFAULT_BUILD).await;
    let updater = fixture.updater(&fixture.config())?;

    updater.update().await?;
    updater.update().await?;

    assert_eq!(fixture.read_target().await?, DEFAULT_BUILD.as_bytes());
    // the second backup is the first update's result
    assert_eq!(
        tokio::fs::read(fixture.paths().backup()).await?,
        DEFAULT_BUILD.as_bytes()
    );
    assert_eq!(fixture.requests("GET").await, 2);
    Ok(())
}

#[tokio::test]
async fn test_download_failure_leaves_target_untouched() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    tokio::fs::write(&fixture.target_path, b"old build").await?;
    fixture.fail_with(500).await;

    let err = fixture
        .updater(&fixture.config())?
        .update()
        .await
        .unwrap_err();

    assert!(matches!(err, UpdateError::Status { .. }));
    assert!(err.to_string().contains("500 Internal Server Error"));
    assert_eq!(fixture.read_target().await?, b"old build");
    assert!(!fixture.paths().backup().exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
#[serial]
async fn test_apply_args_reach_new_build() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    let build = "#!/bin/sh\necho \"$@\" > \"$(dirname \"$0\")/update-args.txt\"\n";
    fixture.publish(Utc::now(), build).await;
    let config = fixture.config().with_apply_args(["apply", "args"]);

    fixture.updater(&config)?.update().await?;

    let args = tokio::fs::read_to_string(fixture.temp_dir.path().join("update-args.txt")).await?;
    assert_eq!(args, "apply args\n");
    assert_eq!(fixture.read_target().await?, build.as_bytes());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
#[serial]
async fn test_failed_apply_keeps_old_build() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    tokio::fs::write(&fixture.target_path, b"old build").await?;
    tokio::fs::write(fixture.paths().backup(), b"previous backup").await?;
    fixture.publish(Utc::now(), "#!/bin/sh\nexit 1\n").await;
    let sink = Arc::new(MemorySink::new());
    let config = fixture.config().with_apply_args(["--self-test"]);
    let updater = fixture.updater(&config)?.with_log_sink(sink.clone());

    let err = updater.update().await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(fixture.read_target().await?, b"old build");
    assert_eq!(
        tokio::fs::read(fixture.paths().backup()).await?,
        b"previous backup"
    );
    // the rejected build stays around for inspection
    assert!(fixture.paths().download().exists());
    assert!(sink.contains(Level::WARN, "failed to apply update"));
    Ok(())
}
