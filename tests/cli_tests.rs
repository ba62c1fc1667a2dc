use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn files_command_reports_identical_inputs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let left = dir.child("left.txt");
    let right = dir.child("right.txt");
    left.write_str("one\ntwo\nthree\n")?;
    right.write_str("one\ntwo\nthree\n")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("files")
        .arg(left.path())
        .arg(right.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("identical"));

    Ok(())
}

#[test]
fn files_command_exits_nonzero_on_differences() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let left = dir.child("left.txt");
    let right = dir.child("right.txt");
    left.write_str("one\ntwo\nthree\n")?;
    right.write_str("one\nTWO\nthree\n")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("files")
        .arg(left.path())
        .arg(right.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("changed"));

    Ok(())
}

#[test]
fn files_command_honors_ignore_case() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let left = dir.child("left.txt");
    let right = dir.child("right.txt");
    left.write_str("Mixed Case Line\n")?;
    right.write_str("mixed case line\n")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("files")
        .arg(left.path())
        .arg(right.path())
        .arg("--ignore-case")
        .assert()
        .success();

    Ok(())
}

#[test]
fn files_command_rejects_unknown_modes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let left = dir.child("l.txt");
    let right = dir.child("r.txt");
    left.write_str("x")?;
    right.write_str("x")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("files")
        .arg(left.path())
        .arg(right.path())
        .arg("--mode")
        .arg("hexdump")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid compare mode"));

    Ok(())
}

#[test]
fn forced_xml_mode_fails_on_malformed_input() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let left = dir.child("l.xml");
    let right = dir.child("r.xml");
    left.write_str("<root><child/></root>")?;
    right.write_str("<root><unclosed>")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("files")
        .arg(left.path())
        .arg(right.path())
        .arg("--mode")
        .arg("xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not well-formed XML"));

    Ok(())
}

#[test]
fn missing_input_is_skipped_not_failed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let left = dir.child("present.txt");
    left.write_str("data")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("files")
        .arg(left.path())
        .arg(dir.child("absent.txt").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped"));

    Ok(())
}

#[test]
fn dirs_command_lists_differing_entries() -> Result<(), Box<dyn std::error::Error>> {
    let left = TempDir::new()?;
    let right = TempDir::new()?;
    left.child("same.txt").write_str("same")?;
    right.child("same.txt").write_str("same")?;
    left.child("changed.txt").write_str("old")?;
    right.child("changed.txt").write_str("new")?;
    left.child("gone.txt").write_str("left only")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("dirs")
        .arg(left.path())
        .arg(right.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("changed.txt"))
        .stdout(predicate::str::contains("gone.txt"))
        .stdout(predicate::str::contains("2 differing file(s)"));

    Ok(())
}

#[test]
fn dirs_command_succeeds_on_equal_trees() -> Result<(), Box<dyn std::error::Error>> {
    let left = TempDir::new()?;
    let right = TempDir::new()?;
    left.child("sub/a.txt").write_str("same")?;
    right.child("sub/a.txt").write_str("same")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("dirs")
        .arg(left.path())
        .arg(right.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 differing file(s)"));

    Ok(())
}

#[test]
fn dirs_command_applies_file_filters() -> Result<(), Box<dyn std::error::Error>> {
    let left = TempDir::new()?;
    let right = TempDir::new()?;
    left.child("code.rs").write_str("old")?;
    right.child("code.rs").write_str("new")?;
    left.child("notes.md").write_str("old notes")?;
    right.child("notes.md").write_str("new notes")?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("dirs")
        .arg(left.path())
        .arg(right.path())
        .arg("--filter")
        .arg("*.rs")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("code.rs"))
        .stdout(predicate::str::contains("notes.md").not())
        .stdout(predicate::str::contains("1 differing file(s)"));

    Ok(())
}

#[test]
fn dirs_command_rejects_unknown_checks() -> Result<(), Box<dyn std::error::Error>> {
    let left = TempDir::new()?;
    let right = TempDir::new()?;

    let mut cmd = Command::cargo_bin("sidediff")?;
    cmd.arg("dirs")
        .arg(left.path())
        .arg(right.path())
        .arg("--check")
        .arg("md5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid check list"));

    Ok(())
}
