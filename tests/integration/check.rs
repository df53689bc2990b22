use anyhow::Result;
use chrono::{SubsecRound, TimeDelta, Utc};
use cliupdater::test_utils::{DEFAULT_BUILD, UpdateFixture, init_test_logging, set_mtime};

/// A build published five days after the local binary was built.
#[tokio::test]
async fn test_outdated_binary_reports_age() -> Result<()> {
    init_test_logging(None);
    let fixture = UpdateFixture::new().await?;
    // HTTP dates carry whole seconds
    let local = (Utc::now() - TimeDelta::days(10)).trunc_subsecs(0);
    set_mtime(&fixture.target_path, local)?;
    fixture.publish(local + TimeDelta::days(5), DEFAULT_BUILD).await;

    let updater = fixture.updater(&fixture.config())?;
    let metadata = updater
        .maybe_check_for_update()
        .await?
        .expect("first check should reach the server");

    assert_eq!(fixture.requests("HEAD").await, 1);
    assert!(metadata.outdated());
    assert_eq!(metadata.age_delta.num_days(), 5);
    assert_eq!(metadata.days_old(), 5);
    Ok(())
}

#[tokio::test]
async fn test_newer_local_binary_is_not_outdated() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    let local = Utc::now() - TimeDelta::hours(1);
    set_mtime(&fixture.target_path, local)?;
    fixture.publish(local - TimeDelta::days(3), DEFAULT_BUILD).await;

    let metadata = fixture
        .updater(&fixture.config())?
        .maybe_check_for_update()
        .await?
        .expect("first check should reach the server");

    assert!(!metadata.outdated());
    assert!(metadata.age_delta < TimeDelta::zero());
    Ok(())
}

#[tokio::test]
async fn test_check_is_gated_until_stamp_expires() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    fixture.publish(Utc::now(), DEFAULT_BUILD).await;
    let updater = fixture.updater(&fixture.config())?;

    assert!(updater.maybe_check_for_update().await?.is_some());
    assert!(updater.maybe_check_for_update().await?.is_none());
    assert_eq!(fixture.requests("HEAD").await, 1);

    // a stamp older than the default day-long interval lets the next call through
    set_mtime(fixture.paths().check(), Utc::now() - TimeDelta::hours(25))?;
    assert!(updater.maybe_check_for_update().await?.is_some());
    assert_eq!(fixture.requests("HEAD").await, 2);
    Ok(())
}

#[tokio::test]
async fn test_stamp_is_shared_between_updaters() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    fixture.publish(Utc::now(), DEFAULT_BUILD).await;

    fixture
        .updater(&fixture.config())?
        .maybe_check_for_update()
        .await?;
    let second = fixture
        .updater(&fixture.config())?
        .maybe_check_for_update()
        .await?;

    assert!(second.is_none());
    assert_eq!(fixture.requests("HEAD").await, 1);
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_reported_and_retried() -> Result<()> {
    let fixture = UpdateFixture::new().await?;
    fixture.fail_with(503).await;
    let updater = fixture.updater(&fixture.config())?;

    let err = updater.maybe_check_for_update().await.unwrap_err();
    assert!(err.to_string().contains("status not 200 OK"));
    assert!(!fixture.paths().check().exists());

    fixture.publish(Utc::now(), DEFAULT_BUILD).await;
    assert!(updater.maybe_check_for_update().await?.is_some());
    Ok(())
}
