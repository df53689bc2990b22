use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn helloupdater() -> Command {
    let mut cmd = Command::cargo_bin("helloupdater").unwrap();
    cmd.env_remove("HELLOUPDATER_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0");
    cmd
}

#[test]
fn test_nocheck_only_greets() {
    helloupdater()
        .arg("--nocheck")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello updater main()"));
}

#[test]
fn test_self_test_exits_cleanly() {
    helloupdater()
        .arg("--self-test")
        .assert()
        .success()
        .stdout(predicate::str::contains("self-test ok"));
}

#[test]
fn test_missing_config_file_fails_update() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.toml");

    helloupdater()
        .arg("--update")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn test_missing_config_file_only_warns_on_check() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.toml");

    helloupdater()
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to check for update"))
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn test_empty_base_url_fails_with_hint() {
    helloupdater()
        .args(["--update", "--base-url", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url is required"))
        .stderr(predicate::str::contains("--base-url"));
}

#[test]
fn test_empty_base_url_only_warns_on_check() {
    helloupdater()
        .args(["--base-url", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello updater main()"))
        .stderr(predicate::str::contains(
            "Warning: failed to check for update: updater configuration: base_url is required",
        ));
}

#[test]
fn test_update_conflicts_with_nocheck() {
    helloupdater().args(["--update", "--nocheck"]).assert().failure();
}

/// Runs the binary against a mock server; the published name depends on the host.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
mod against_server {
    use super::*;
    use chrono::{SubsecRound, TimeDelta, Utc};
    use cliupdater::test_utils::{DEFAULT_BUILD, UpdateFixture, set_mtime};
    use serial_test::serial;

    fn against(fixture: &UpdateFixture) -> Command {
        let mut cmd = helloupdater();
        cmd.arg("--base-url")
            .arg(fixture.base_url())
            .arg("--target")
            .arg(&fixture.target_path);
        cmd
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_outdated_binary_prints_update_hint() {
        let fixture = UpdateFixture::new().await.unwrap();
        let local = (Utc::now() - TimeDelta::days(10)).trunc_subsecs(0);
        set_mtime(&fixture.target_path, local).unwrap();
        fixture.publish(local + TimeDelta::days(5), DEFAULT_BUILD).await;

        against(&fixture)
            .assert()
            .success()
            .stdout(predicate::str::contains("hello updater main()"))
            .stderr(predicate::str::contains(
                "run with --update to update; your version is 5 days old",
            ));
        assert!(fixture.paths().check().exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_check_failure_is_only_a_warning() {
        let fixture = UpdateFixture::new().await.unwrap();
        fixture.fail_with(404).await;

        against(&fixture)
            .assert()
            .success()
            .stderr(predicate::str::contains("failed to check for update"));
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_update_installs_published_build() {
        let fixture = UpdateFixture::new().await.unwrap();
        fixture.publish(Utc::now(), DEFAULT_BUILD).await;

        against(&fixture)
            .args(["--update", "--apply-arg", "--self-test"])
            .assert()
            .success();

        assert_eq!(
            fixture.read_target().await.unwrap(),
            DEFAULT_BUILD.as_bytes()
        );
        assert!(fixture.paths().backup().exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_failure_exits_nonzero() {
        let fixture = UpdateFixture::new().await.unwrap();
        fixture.fail_with(500).await;

        against(&fixture)
            .arg("--update")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("500 Internal Server Error"));
        assert!(fixture.read_target().await.unwrap().is_empty());
    }
}
