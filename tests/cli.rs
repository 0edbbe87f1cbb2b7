use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("phalanx-figures").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("phalanx-figures"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn list_names_every_figure() {
    let mut cmd = Command::cargo_bin("phalanx-figures").unwrap();
    cmd.arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("scalability"))
        .stdout(predicate::str::contains("proposers_tps"))
        .stdout(predicate::str::contains("front-attack-rate-6w"));
}

#[test]
fn render_writes_named_file() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("phalanx-figures").unwrap();
    cmd.args(["render", "evaluation", "--out-dir"]).arg(dir.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("evaluation.svg"));
    assert!(dir.path().join("evaluation.svg").exists());
}

#[test]
fn render_png_at_custom_dpi() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("phalanx-figures").unwrap();
    cmd.args(["render", "attacked", "--format", "png", "--dpi", "72", "--out-dir"])
        .arg(dir.path());
    cmd.assert().success();
    assert!(dir.path().join("attacked.png").exists());
}

#[test]
fn export_then_render_file() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("proposers.json");
    Command::cargo_bin("phalanx-figures")
        .unwrap()
        .args(["export", "proposers", "--out"])
        .arg(&json)
        .assert()
        .success();

    let out = dir.path().join("proposers.png");
    Command::cargo_bin("phalanx-figures")
        .unwrap()
        .arg("render-file")
        .arg(&json)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn export_csv_by_extension() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("proposers.csv");
    Command::cargo_bin("phalanx-figures")
        .unwrap()
        .args(["export", "proposers", "--out"])
        .arg(&csv)
        .assert()
        .success();
    let txt = std::fs::read_to_string(&csv).unwrap();
    assert!(txt.starts_with("chart,panel,axis,series"));
}

#[test]
fn unknown_figure_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("phalanx-figures").unwrap();
    cmd.args(["render", "no-such-figure", "--out-dir"]).arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown figure"));
}

#[test]
fn unsupported_output_extension_fails() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("e.json");
    Command::cargo_bin("phalanx-figures")
        .unwrap()
        .args(["export", "evaluation", "--out"])
        .arg(&json)
        .assert()
        .success();
    Command::cargo_bin("phalanx-figures")
        .unwrap()
        .arg("render-file")
        .arg(&json)
        .arg("--out")
        .arg(dir.path().join("e.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported output format"));
}
