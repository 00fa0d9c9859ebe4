use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn shellhere(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shellhere").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("SHELLHERE_SHELL")
        .env_remove("SHELLHERE_MULTI_SELECT");
    cmd
}

fn write_config(dir: &Path, candidates: &[&str]) -> std::path::PathBuf {
    let list = candidates
        .iter()
        .map(|c| format!("{c:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    let path = dir.join("shellhere.toml");
    fs::write(&path, format!("[launcher]\ncandidates = [{list}]\n")).expect("write config");
    path
}

#[test]
fn help_displays_usage() {
    let home = tempfile::tempdir().unwrap();
    shellhere(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn command_id_is_printed() {
    let home = tempfile::tempdir().unwrap();
    shellhere(home.path())
        .arg("command-id")
        .assert()
        .success()
        .stdout("{0dc193e5-18d2-4acc-8438-d01ddc43b95a}:0x0100\n");
}

#[test]
fn candidates_lists_cli_shells_first() {
    let home = tempfile::tempdir().unwrap();
    let config = write_config(home.path(), &["/missing/pwsh", "powershell"]);
    shellhere(home.path())
        .args(["candidates", "--shell", "nu", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout("1. nu\n2. /missing/pwsh\n3. powershell\n");
}

#[test]
fn missing_shells_are_a_silent_no_op() {
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let config = write_config(
        home.path(),
        &["/definitely/missing/pwsh", "definitely-missing-powershell"],
    );

    shellhere(home.path())
        .arg("--config")
        .arg(&config)
        .arg(work.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("no shell launched"));
}

#[test]
fn bad_snapshot_fails_loudly() {
    let home = tempfile::tempdir().unwrap();
    let snapshot = home.path().join("selection.json");
    fs::write(&snapshot, "{ not json").unwrap();

    shellhere(home.path())
        .arg("--selection-file")
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid selection snapshot"));
}

#[cfg(unix)]
#[test]
fn launches_first_available_candidate_in_parent_folder() {
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let file = work.path().join("notes.txt");
    fs::write(&file, "hello").unwrap();
    let config = write_config(home.path(), &["/definitely/missing/pwsh", "true"]);

    shellhere(home.path())
        .args(["-v", "open", "--wait", "--config"])
        .arg(&config)
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("shell started"))
        .stderr(predicate::str::contains("true"));
}
