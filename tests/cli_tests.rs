use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn wpwatch_cmd(temp_dir: &TempDir) -> Command {
    let db_path = temp_dir.path().join("test.db");
    let mut cmd = Command::cargo_bin("wpwatch").unwrap();
    cmd.env("WPWATCH_DB_PATH", db_path.to_str().unwrap())
        .env_remove("WPWATCH_WEBHOOK_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("wpwatch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("interval"));
}

#[test]
fn test_list_without_sites() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sites configured"));
}

#[test]
fn test_add_then_list() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .args(["add", "https://blog.example.com", "--name", "Example Blog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site added: Example Blog"));

    wpwatch_cmd(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Example Blog"))
        .stdout(predicate::str::contains("https://blog.example.com"));
}

#[test]
fn test_add_duplicate_is_reported() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .args(["add", "https://blog.example.com"])
        .assert()
        .success();

    wpwatch_cmd(&temp_dir)
        .args(["add", "https://blog.example.com/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site already exists"));
}

#[test]
fn test_add_rejects_invalid_url() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .args(["add", "ftp://blog.example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid site URL"));
}

#[test]
fn test_interval_defaults_to_one_minute() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .arg("interval")
        .assert()
        .success()
        .stdout(predicate::str::contains("Check interval: 1 minute(s)."));
}

#[test]
fn test_interval_set_and_show() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .args(["interval", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set to 15"));

    wpwatch_cmd(&temp_dir)
        .arg("interval")
        .assert()
        .success()
        .stdout(predicate::str::contains("Check interval: 15 minute(s)."));
}

#[test]
fn test_interval_rejects_zero() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .args(["interval", "0"])
        .assert()
        .failure();
}

#[test]
fn test_check_without_sites() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sites configured"));
}

#[test]
fn test_recent_shows_empty_cache() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .args(["add", "https://blog.example.com"])
        .assert()
        .success();

    wpwatch_cmd(&temp_dir)
        .arg("recent")
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts cached yet."));
}

#[test]
fn test_open_out_of_range() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .args(["open", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Site number out of range"));
}

#[test]
fn test_bad_timeout_setting_fails() {
    let temp_dir = TempDir::new().unwrap();

    wpwatch_cmd(&temp_dir)
        .env("WPWATCH_HTTP_TIMEOUT_SECS", "soon")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

mod opml {
    use super::*;

    #[test]
    fn test_export_contains_sites() {
        let temp_dir = TempDir::new().unwrap();

        wpwatch_cmd(&temp_dir)
            .args(["add", "https://blog.example.com", "-n", "Example"])
            .assert()
            .success();

        wpwatch_cmd(&temp_dir)
            .arg("export")
            .assert()
            .success()
            .stdout(predicate::str::contains("<opml"))
            .stdout(predicate::str::contains("https://blog.example.com/feed"));
    }

    #[test]
    fn test_import_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let opml_path = temp_dir.path().join("sites.opml");
        std::fs::write(
            &opml_path,
            r#"<?xml version="1.0"?>
<opml version="2.0">
  <head><title>Sites</title></head>
  <body>
    <outline text="One" type="rss" xmlUrl="https://one.example/feed"/>
    <outline text="Two" htmlUrl="https://two.example"/>
  </body>
</opml>"#,
        )
        .unwrap();

        wpwatch_cmd(&temp_dir)
            .args(["import", opml_path.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Import complete: 2 added, 0 duplicates, 0 failed"));

        wpwatch_cmd(&temp_dir)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("One"))
            .stdout(predicate::str::contains("Two"));
    }
}
