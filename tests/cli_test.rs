//! End-to-end CLI tests against a local catalog.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A workspace with a local catalog directory and a config pointing at it.
struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let catalog = temp.path().join("catalog");
        fs::create_dir_all(&catalog).unwrap();
        let config = format!("catalog:\n  path: {}\n", catalog.display());
        fs::write(temp.path().join("config.yml"), config).unwrap();
        Self { temp }
    }

    fn catalog(&self) -> std::path::PathBuf {
        self.temp.path().join("catalog")
    }

    fn config(&self) -> std::path::PathBuf {
        self.temp.path().join("config.yml")
    }

    fn write_entry(&self, id: &str, body: &str) {
        fs::write(self.catalog().join(id), body).unwrap();
    }

    fn write_order(&self, content: &str) {
        fs::write(self.catalog().join("update-order"), content).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("freshen"));
        cmd.arg("--config").arg(self.config());
        cmd
    }
}

const OK_ENTRY: &str = r#"
description() { echo "Good tool"; }
run() { echo updating; }
"#;

const SKIP_ENTRY: &str = r#"
description() { echo "Other platform"; }
condition() { echo "not applicable"; return 2; }
run() { echo should-not-run; }
"#;

const FAIL_ENTRY: &str = r#"
description() { echo "Broken tool"; }
run() { echo boom >&2; exit 7; }
"#;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Catalog-driven update orchestration"));
}

#[test]
fn cli_shows_version() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn run_without_targets_prints_usage() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.arg("run");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn run_without_catalog_source_exits_3() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yml");
    // Config file exists but configures no source.
    fs::write(&config, "catalog: {}\n").unwrap();

    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.arg("--config").arg(&config).args(["run", "all"]);
    cmd.assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("No catalog source configured"));
}

#[test]
fn run_all_without_order_file_exits_4() {
    let ws = Workspace::new();
    ws.write_entry("vim.sh", OK_ENTRY);

    ws.cmd()
        .args(["run", "all"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Order file not found"));
}

#[test]
fn run_all_follows_the_order_file() {
    let ws = Workspace::new();
    ws.write_entry("b.sh", OK_ENTRY);
    ws.write_entry(
        "a.sh",
        r#"
description() { echo "Second tool"; }
run() { echo also-updating; }
"#,
    );
    ws.write_order("b.sh\na.sh\n");

    let output = ws
        .cmd()
        .args(["run", "all"])
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8_lossy(&output.stdout);

    let first = stdout.find("Good tool").expect("first entry reported");
    let second = stdout.find("Second tool").expect("second entry reported");
    assert!(first < second, "entries out of order:\n{stdout}");
    assert!(stdout.contains("Summary"));
}

#[test]
fn explicit_targets_need_no_order_file() {
    let ws = Workspace::new();
    ws.write_entry("vim.sh", OK_ENTRY);

    ws.cmd()
        .args(["run", "vim.sh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Good tool"));
}

#[test]
fn skipped_entry_reports_the_condition_detail_and_does_not_run() {
    let ws = Workspace::new();
    ws.write_entry("skip.sh", SKIP_ENTRY);

    ws.cmd()
        .args(["run", "skip.sh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not applicable"))
        .stdout(predicate::str::contains("should-not-run").not());
}

#[test]
fn failing_entry_does_not_stop_the_run() {
    let ws = Workspace::new();
    ws.write_entry("fail.sh", FAIL_ENTRY);
    ws.write_entry("ok.sh", OK_ENTRY);
    ws.write_order("fail.sh\nok.sh\n");

    ws.cmd()
        .args(["run", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Good tool"));
}

#[test]
fn abort_on_fail_propagates_the_entry_status() {
    let ws = Workspace::new();
    ws.write_entry("fail.sh", FAIL_ENTRY);
    ws.write_entry("ok.sh", OK_ENTRY);
    ws.write_order("fail.sh\nok.sh\n");

    ws.cmd()
        .args(["run", "--abort-on-fail", "all"])
        .assert()
        .failure()
        .code(7)
        .stdout(predicate::str::contains("Good tool").not());
}

#[test]
fn entry_sees_the_run_environment() {
    let ws = Workspace::new();
    ws.write_entry(
        "env.sh",
        r#"
description() { echo "Env check"; }
run() {
    test -n "$FRESHEN" || exit 1
    test -n "$FRESHEN_LOG" || exit 1
    test -n "$FRESHEN_OS" || exit 1
    echo "env ok"
}
"#,
    );

    ws.cmd()
        .args(["run", "env.sh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("env ok"));
}

#[test]
fn subtarget_events_appear_in_the_summary() {
    let ws = Workspace::new();
    ws.write_entry(
        "sub.sh",
        r#"
description() { echo "Parent"; }
run() {
    "$FRESHEN" helper report "Child step" "did a thing"
}
"#,
    );

    let output = ws
        .cmd()
        .args(["run", "sub.sh"])
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8_lossy(&output.stdout);

    let summary_at = stdout.find("Summary").expect("summary printed");
    let child_mentions: Vec<usize> = stdout
        .match_indices("Child step")
        .map(|(i, _)| i)
        .collect();
    assert!(
        child_mentions.iter().any(|&i| i > summary_at),
        "sub-step missing from summary:\n{stdout}"
    );
}

#[test]
fn list_prints_the_run_order() {
    let ws = Workspace::new();
    ws.write_order("# editors\nvim.sh\ntmux.sh\n");

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::diff("vim.sh\ntmux.sh\n"));
}

#[test]
fn completions_generate_for_bash() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("freshen"));
}

#[test]
fn helper_continue_if_uses_the_exported_platform() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.env("FRESHEN_OS", "linux")
        .env("FRESHEN_DISTRO", "ubuntu")
        .env("FRESHEN_OS_VERSION", "24.04")
        .env("FRESHEN_OS_CODENAME", "noble")
        .env("FRESHEN_OS_DETAILS", "wsl")
        .args(["helper", "continue-if", "ubuntu[wsl]"]);
    cmd.assert().success();
}

#[test]
fn helper_continue_if_mismatch_exits_2_with_platform_name() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.env("FRESHEN_OS", "linux")
        .env("FRESHEN_DISTRO", "ubuntu")
        .env("FRESHEN_OS_VERSION", "24.04")
        .env("FRESHEN_OS_CODENAME", "noble")
        .env("FRESHEN_OS_DETAILS", "")
        .args(["helper", "continue-if", "macos"]);
    cmd.assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("ubuntu 24.04"));
}

#[test]
fn helper_skip_if_match_exits_2() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.env("FRESHEN_OS", "macos")
        .env("FRESHEN_DISTRO", "")
        .env("FRESHEN_OS_VERSION", "14.2")
        .env("FRESHEN_OS_CODENAME", "")
        .env("FRESHEN_OS_DETAILS", "")
        .args(["helper", "skip-if", "macos"]);
    cmd.assert().failure().code(2);
}

#[test]
fn helper_invalid_constraint_is_an_error() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.args(["helper", "continue-if", "linux["]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid OS constraint"));
}

#[test]
fn helper_installed_version_reports_sentinel_for_missing_tool() {
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.args([
        "helper",
        "installed-version",
        "freshen-no-such-tool-12345",
        "--version",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("(none)\n"));
}

#[test]
fn run_with_git_catalog_clones_and_executes() {
    let temp = TempDir::new().unwrap();
    let upstream = init_upstream_catalog(temp.path());
    let data_dir = temp.path().join("clone");
    let config = temp.path().join("config.yml");
    fs::write(
        &config,
        format!("catalog:\n  url: {}\n  git_ref: main\n", upstream.display()),
    )
    .unwrap();

    // Point the managed clone somewhere controllable.
    let mut cmd = Command::new(cargo_bin("freshen"));
    cmd.env("XDG_DATA_HOME", &data_dir)
        .arg("--config")
        .arg(&config)
        .args(["run", "all"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Git tool"));
}

fn init_upstream_catalog(parent: &Path) -> std::path::PathBuf {
    fn git(args: &[&str], cwd: &Path) {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(cwd)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let bare = parent.join("upstream.git");
    let work = parent.join("upstream-work");
    fs::create_dir_all(&work).unwrap();

    git(
        &["init", "--bare", "--initial-branch=main", bare.to_str().unwrap()],
        parent,
    );
    git(&["clone", bare.to_str().unwrap(), work.to_str().unwrap()], parent);
    git(&["config", "user.name", "Test"], &work);
    git(&["config", "user.email", "test@test.com"], &work);

    fs::write(
        work.join("git.sh"),
        r#"
description() { echo "Git tool"; }
run() { echo updated; }
"#,
    )
    .unwrap();
    fs::write(work.join("update-order"), "git.sh\n").unwrap();
    git(&["add", "."], &work);
    git(&["commit", "-m", "initial"], &work);
    git(&["push", "origin", "HEAD:main"], &work);

    bare
}
