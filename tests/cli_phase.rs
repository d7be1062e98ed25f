use predicates::prelude::*;
use assert_cmd::Command;
use tempfile::TempDir;

#[test]
fn command_phase_chain() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("parhap")?;
    let output = cmd
        .arg("phase")
        .arg("tests/phase/chain.tsv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout, "01010\n");

    Ok(())
}

#[test]
fn command_phase_triangle() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("parhap")?;
    let output = cmd
        .arg("phase")
        .arg("tests/phase/triangle.tsv")
        .arg("--branch")
        .arg("2")
        .arg("--parallel")
        .arg("4")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "000\n");

    Ok(())
}

#[test]
fn command_phase_blocks_tsv() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("parhap")?;
    let output = cmd
        .arg("phase")
        .arg("tests/phase/blocks.tsv")
        .arg("--style")
        .arg("tsv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 6);
    assert!(stdout.contains("0\t0\t0\n"));
    assert!(stdout.contains("3\t3\t0\n"));
    assert!(stdout.contains("4\t4\t1\n"));
    assert!(stdout.contains("5\t5\t0\n"));

    Ok(())
}

#[test]
fn command_phase_start() -> anyhow::Result<()> {
    // Starting from 1 fixes position 1 to 0, flipping the chain
    let mut cmd = Command::cargo_bin("parhap")?;
    let output = cmd
        .arg("phase")
        .arg("tests/phase/chain.tsv")
        .arg("--start")
        .arg("1")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "10101\n");

    Ok(())
}

#[test]
fn command_phase_positions_and_outfile() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let output = temp.path().join("phased.txt");

    let mut cmd = Command::cargo_bin("parhap")?;
    cmd.arg("phase")
        .arg("tests/phase/triangle.tsv")
        .arg("--positions")
        .arg("5")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let hap = std::fs::read_to_string(&output)?;
    assert_eq!(hap.trim().len(), 5);
    assert!(hap.starts_with("000"));

    Ok(())
}

#[test]
fn command_phase_stdin() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("parhap")?;
    cmd.arg("phase")
        .arg("stdin")
        .write_stdin("0 1 0 2\n")
        .assert()
        .success()
        .stdout("01\n");

    Ok(())
}

#[test]
fn command_phase_verbose_logs_levels() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("parhap")?;
    cmd.arg("phase")
        .arg("tests/phase/chain.tsv")
        .arg("--verbose")
        .assert()
        .success()
        .stdout("01010\n")
        .stderr(predicate::str::contains("search level"));

    Ok(())
}

#[test]
fn command_phase_bad_input() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("parhap")?;
    cmd.arg("phase")
        .arg("stdin")
        .write_stdin("0 1 2\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 4 fields"));

    let mut cmd = Command::cargo_bin("parhap")?;
    cmd.arg("phase")
        .arg("tests/phase/chain.tsv")
        .arg("--start")
        .arg("9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));

    let mut cmd = Command::cargo_bin("parhap")?;
    cmd.arg("phase")
        .arg("tests/phase/chain.tsv")
        .arg("--branch")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch workers must be positive"));

    Ok(())
}

#[test]
fn command_phase_weight_overflow() -> anyhow::Result<()> {
    let input = format!("0 1 {} 0\n0 1 1 0\n", usize::MAX);
    let mut cmd = Command::cargo_bin("parhap")?;
    cmd.arg("phase")
        .arg("stdin")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("overflow"));

    Ok(())
}
