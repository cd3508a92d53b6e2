use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Lays out a model directory with its companion metadata files
fn write_model_dir(root: &Path, name: &str, context_nt: usize, default_threshold: f64) -> PathBuf {
    let dir = root.join(name);
    let assets = dir.join("assets.extra");
    fs::create_dir_all(&assets).unwrap();
    fs::write(assets.join("context_nt.arg"), format!("{}\n", context_nt)).unwrap();
    fs::write(
        assets.join("default_threshold.arg"),
        format!("{}\n", default_threshold),
    )
    .unwrap();
    dir
}

/// A stand-in model runtime: emits one fixed score per input line,
/// picking the score from the model directory it was handed. Touches a
/// marker file so tests can check whether a model was invoked at all.
fn write_runner(root: &Path, cls_score: f64, reg_score: f64) -> PathBuf {
    let script = root.join("runner.sh");
    let body = format!(
        r#"#!/bin/sh
touch "$1/invoked"
case "$1" in
  *cls*) score={} ;;
  *) score={} ;;
esac
while read -r line; do
  echo "$score"
done
"#,
        cls_score, reg_score
    );
    fs::write(&script, body).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[test]
fn command_predict_highly_active() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let cls = write_model_dir(temp.path(), "cls_model", 2, 0.5);
    let reg = write_model_dir(temp.path(), "reg_model", 2, -3.2);
    let runner = write_runner(temp.path(), 0.9, -3.0);

    let input = temp.path().join("pairs.tsv");
    fs::write(&input, "TTACGGG\tACG\n")?;

    let mut cmd = Command::cargo_bin("gact")?;
    let output = cmd
        .arg("predict")
        .arg(&cls)
        .arg(&reg)
        .arg(&input)
        .arg("--runner")
        .arg(&runner)
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    // classifier 0.9 >= 0.5, regression -3.0 shifts to 1.0
    assert_eq!(stdout, "TTACGGG\tACG\t1\n");

    Ok(())
}

#[test]
fn command_predict_inactive_skips_regression() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let cls = write_model_dir(temp.path(), "cls_model", 2, 0.5);
    let reg = write_model_dir(temp.path(), "reg_model", 2, -3.2);
    let runner = write_runner(temp.path(), 0.2, -3.0);

    let input = temp.path().join("pairs.tsv");
    fs::write(&input, "TTACGGG\tACG\nTTACCGG\tACC\n")?;

    let mut cmd = Command::cargo_bin("gact")?;
    let output = cmd
        .arg("predict")
        .arg(&cls)
        .arg(&reg)
        .arg(&input)
        .arg("--runner")
        .arg(&runner)
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "TTACGGG\tACG\t0\nTTACCGG\tACC\t0\n");

    // Nothing was classified active, so the regression runtime never ran
    assert!(cls.join("invoked").exists());
    assert!(!reg.join("invoked").exists());

    Ok(())
}

#[test]
fn command_predict_threshold_override() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let cls = write_model_dir(temp.path(), "cls_model", 2, 0.5);
    let reg = write_model_dir(temp.path(), "reg_model", 2, -3.2);
    let runner = write_runner(temp.path(), 0.9, -3.0);

    let input = temp.path().join("pairs.tsv");
    fs::write(&input, "TTACGGG\tACG\n")?;

    let mut cmd = Command::cargo_bin("gact")?;
    let output = cmd
        .arg("predict")
        .arg(&cls)
        .arg(&reg)
        .arg(&input)
        .arg("--runner")
        .arg(&runner)
        .arg("--class-threshold")
        .arg("0.95")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "TTACGGG\tACG\t0\n");

    Ok(())
}

#[test]
fn command_predict_outfile() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let cls = write_model_dir(temp.path(), "cls_model", 2, 0.5);
    let reg = write_model_dir(temp.path(), "reg_model", 2, -3.2);
    let runner = write_runner(temp.path(), 0.9, -3.5);

    let input = temp.path().join("pairs.tsv");
    let outfile = temp.path().join("preds.tsv");
    fs::write(&input, "TTACGGG\tACG\n")?;

    let mut cmd = Command::cargo_bin("gact")?;
    cmd.arg("predict")
        .arg(&cls)
        .arg(&reg)
        .arg(&input)
        .arg("--runner")
        .arg(&runner)
        .arg("-o")
        .arg(&outfile)
        .assert()
        .success();

    // -3.5 shifts to 0.5: active but below the highly-active tier, the
    // activity column still carries the shifted value
    let written = fs::read_to_string(&outfile)?;
    assert_eq!(written, "TTACGGG\tACG\t0.5\n");

    Ok(())
}

#[test]
fn command_predict_context_mismatch() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let cls = write_model_dir(temp.path(), "cls_model", 20, 0.5);
    let reg = write_model_dir(temp.path(), "reg_model", 10, -3.2);
    let runner = write_runner(temp.path(), 0.9, -3.0);

    let input = temp.path().join("pairs.tsv");
    fs::write(&input, "TTACGGG\tACG\n")?;

    let mut cmd = Command::cargo_bin("gact")?;
    cmd.arg("predict")
        .arg(&cls)
        .arg(&reg)
        .arg(&input)
        .arg("--runner")
        .arg(&runner)
        .assert()
        .failure()
        .stderr(predicate::str::contains("context_nt"));

    Ok(())
}

#[test]
fn command_predict_wrong_context_amount() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    // Models trained with 20 nt of context, but inputs only carry 2
    let cls = write_model_dir(temp.path(), "cls_model", 20, 0.5);
    let reg = write_model_dir(temp.path(), "reg_model", 20, -3.2);
    let runner = write_runner(temp.path(), 0.9, -3.0);

    let input = temp.path().join("pairs.tsv");
    fs::write(&input, "TTACGGG\tACG\n")?;

    let mut cmd = Command::cargo_bin("gact")?;
    cmd.arg("predict")
        .arg(&cls)
        .arg(&reg)
        .arg(&input)
        .arg("--runner")
        .arg(&runner)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 43"));

    Ok(())
}

#[test]
fn command_predict_malformed_input() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let cls = write_model_dir(temp.path(), "cls_model", 2, 0.5);
    let reg = write_model_dir(temp.path(), "reg_model", 2, -3.2);
    let runner = write_runner(temp.path(), 0.9, -3.0);

    let input = temp.path().join("pairs.tsv");
    fs::write(&input, "AC\tACGT\n")?;

    let mut cmd = Command::cargo_bin("gact")?;
    cmd.arg("predict")
        .arg(&cls)
        .arg(&reg)
        .arg(&input)
        .arg("--runner")
        .arg(&runner)
        .assert()
        .failure()
        .stderr(predicate::str::contains("shorter than guide"));

    Ok(())
}

#[test]
fn command_predict_missing_metadata() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let cls = temp.path().join("cls_model");
    fs::create_dir_all(&cls)?;
    let reg = write_model_dir(temp.path(), "reg_model", 2, -3.2);
    let runner = write_runner(temp.path(), 0.9, -3.0);

    let input = temp.path().join("pairs.tsv");
    fs::write(&input, "TTACGGG\tACG\n")?;

    let mut cmd = Command::cargo_bin("gact")?;
    cmd.arg("predict")
        .arg(&cls)
        .arg(&reg)
        .arg(&input)
        .arg("--runner")
        .arg(&runner)
        .assert()
        .failure()
        .stderr(predicate::str::contains("context_nt.arg"));

    Ok(())
}
