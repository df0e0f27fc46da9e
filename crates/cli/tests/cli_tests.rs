use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Runs against an isolated config file so the user's defaults never leak in.
fn xrename(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("xrename").expect("binary");
    cmd.arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), name.as_bytes()).expect("write fixture");
}

#[test]
fn missing_directory_exits_with_error() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");

    xrename(&config)
        .arg(temp.path().join("nope"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Path does not exist"));
}

#[test]
fn file_target_exits_with_error() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");
    touch(temp.path(), "a.txt");

    xrename(&config)
        .arg(temp.path().join("a.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Not a directory"));
}

#[test]
fn dry_run_previews_without_renaming() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");
    touch(temp.path(), "x.txt");
    touch(temp.path(), "y.txt");

    xrename(&config)
        .arg(temp.path())
        .args(["--prefix", "N_", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Preview] x.txt -> N_x.txt"))
        .stdout(predicate::str::contains(
            "[Preview mode] 2 files are expected to be changed.",
        ));

    assert!(temp.path().join("x.txt").exists());
    assert!(!temp.path().join("N_x.txt").exists());
}

#[test]
fn numbered_rename_with_filter() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");
    for name in ["b.jpg", "a.JPG", "notes.txt"] {
        touch(temp.path(), name);
    }

    xrename(&config)
        .arg(temp.path())
        .args(["--number", "--filter", ".jpg", "--ext", "jpeg"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully changed the names of 2 files.",
        ));

    assert!(temp.path().join("a_1.jpeg").exists());
    assert!(temp.path().join("b_2.jpeg").exists());
    assert!(temp.path().join("notes.txt").exists());
}

#[test]
fn collisions_are_reported_as_skipped() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");
    touch(temp.path(), "a.txt");
    touch(temp.path(), "b.txt");

    xrename(&config)
        .arg(temp.path())
        .args(["--pattern", "same"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 files were skipped."));
}

#[test]
fn per_file_errors_set_failure_exit_code() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");
    touch(temp.path(), "a.txt");

    xrename(&config)
        .arg(temp.path())
        .args(["--prefix", "sub/"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1 files processing failed."));

    assert!(temp.path().join("a.txt").exists());
}

#[test]
fn invalid_pattern_falls_back_to_default_rule() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");
    touch(temp.path(), "a.txt");

    xrename(&config)
        .arg(temp.path())
        .args(["--pattern", "{nope}", "--suffix", "_s"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pattern error"));

    assert!(temp.path().join("a_s.txt").exists());
}

#[test]
fn json_output_reports_counts() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");
    touch(temp.path(), "a.txt");
    touch(temp.path(), "b.txt");

    let output = xrename(&config)
        .arg(temp.path())
        .args(["--suffix", "_v2", "--output", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Renamed: a.txt -> a_v2.txt"));

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    assert_eq!(json["total"], 2);
    assert_eq!(json["renamed"], 2);
    assert_eq!(json["skipped"], 0);
    assert_eq!(json["errors"], 0);
}

#[test]
fn log_file_receives_log_lines() {
    let config = tempdir().expect("tempdir");
    let temp = tempdir().expect("tempdir");
    let logs = tempdir().expect("tempdir");
    let log_path = logs.path().join("run.log");
    touch(temp.path(), "a.txt");

    xrename(&config)
        .arg(temp.path())
        .args(["--prefix", "L_", "--log"])
        .arg(&log_path)
        .assert()
        .success();

    let body = fs::read_to_string(&log_path).expect("log file");
    assert!(body.contains("Renamed: a.txt -> L_a.txt"));
    assert!(body.contains(" - INFO - "));
}

#[test]
fn config_defaults_enable_recursion() {
    let config = tempdir().expect("tempdir");
    fs::write(
        config.path().join("config.toml"),
        "recursive_default = true\n",
    )
    .expect("write config");
    let temp = tempdir().expect("tempdir");
    fs::create_dir(temp.path().join("sub")).expect("mkdir");
    touch(&temp.path().join("sub"), "deep.txt");

    xrename(&config)
        .arg(temp.path())
        .args(["--prefix", "R_"])
        .assert()
        .success();

    assert!(temp.path().join("sub").join("R_deep.txt").exists());
}

#[test]
fn show_config_prints_effective_values() {
    let config = tempdir().expect("tempdir");
    fs::write(
        config.path().join("config.toml"),
        "filter_default = [\"jpg\"]\n",
    )
    .expect("write config");

    xrename(&config)
        .arg("--show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file:"))
        .stdout(predicate::str::contains("filter_default"));
}
