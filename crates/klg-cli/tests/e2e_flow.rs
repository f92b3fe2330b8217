//! End-to-end tests driving the compiled `klg` binary.
//!
//! Every test runs with `HOME` and the klog folder inside a temporary
//! directory, so bookmarks and config never touch the real user files.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn klg_binary() -> String {
    env!("CARGO_BIN_EXE_klg").to_string()
}

fn klg(home: &Path) -> Command {
    let mut cmd = Command::new(klg_binary());
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("KLG_KLOG_FOLDER", home.join(".klog"))
        .env_remove("KLG_DEFAULT_AGGREGATE")
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    klg(home).args(args).output().expect("failed to run klg")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "klg should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn write_records(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path.to_str().unwrap().to_string()
}

const RECORDS: &str = "\
2023-01-20 (8h!)
    9:00 - 12:00 Review
    4h

2023-01-05
Planning day
    1h30m

2023-02-01
    30m
";

#[test]
fn month_report_from_file() {
    let temp = TempDir::new().unwrap();
    let file = write_records(temp.path(), "time.klg", RECORDS);

    let out = stdout(&run(temp.path(), &["report", &file, "--aggregate", "month"]));
    let expected = [
        "            Total",
        "2023 Jan   8h 30m",
        "     Feb      30m",
        "         ========",
        "               9h",
    ];
    assert_eq!(out.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn report_json_uses_configured_default_aggregate() {
    let temp = TempDir::new().unwrap();
    let file = write_records(temp.path(), "time.klg", RECORDS);

    let output = klg(temp.path())
        .env("KLG_DEFAULT_AGGREGATE", "year")
        .args(["report", &file, "--json"])
        .output()
        .unwrap();
    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["hash"], 2023);
    assert_eq!(rows[0]["total"], "9h");
    assert_eq!(rows[0]["record_count"], 3);
}

#[test]
fn total_from_stdin() {
    let temp = TempDir::new().unwrap();

    let mut child = klg(temp.path())
        .arg("total")
        .arg("--diff")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(RECORDS.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(
        stdout(&output),
        "Total: 9h\nShould: 8h!\nDiff: +1h\n(In 3 records)\n"
    );
}

#[test]
fn missing_input_is_reported() {
    let temp = TempDir::new().unwrap();
    let output = run(temp.path(), &["total"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input given"));
}

#[test]
fn failures_exit_with_stable_codes() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.klg");

    let no_target = run(temp.path(), &["stop"]);
    assert_eq!(no_target.status.code(), Some(3));

    let no_file = run(temp.path(), &["total", missing.to_str().unwrap()]);
    assert_eq!(no_file.status.code(), Some(7));

    let unknown = run(temp.path(), &["total", "@nope"]);
    assert_eq!(unknown.status.code(), Some(6));
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("no bookmark named @nope"));

    std::fs::create_dir_all(temp.path().join(".klog")).unwrap();
    std::fs::write(temp.path().join(".klog/bookmarks.json"), "not json").unwrap();
    let broken = run(temp.path(), &["bookmarks", "list"]);
    assert_eq!(broken.status.code(), Some(5));

    let file = write_records(temp.path(), "bad.klg", "nonsense\n");
    assert_eq!(run(temp.path(), &["total", &file]).status.code(), Some(1));
}

#[test]
fn multi_line_start_summary_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let file = write_records(temp.path(), "time.klg", RECORDS);

    let output = run(
        temp.path(),
        &["start", &file, "--date", "2023-02-01", "--time", "13:00", "--summary", "a\nb"],
    );
    assert!(!output.status.success());
    assert_eq!(std::fs::read_to_string(&file).unwrap(), RECORDS);
}

#[test]
fn parse_errors_fail_with_line_numbers() {
    let temp = TempDir::new().unwrap();
    let file = write_records(temp.path(), "bad.klg", "2023-01-05\n    9:00 - 8:00\n    nonsense\n");

    let output = run(temp.path(), &["total", &file]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2: illegal range"), "{stderr}");
    assert!(stderr.contains("line 3: invalid entry"), "{stderr}");
}

#[test]
fn default_bookmark_is_used_without_files() {
    let temp = TempDir::new().unwrap();
    let file = write_records(temp.path(), "time.klg", RECORDS);

    stdout(&run(temp.path(), &["bookmarks", "set", &file]));
    stdout(&run(temp.path(), &["bookmarks", "set", &file, "@work"]));

    let list = stdout(&run(temp.path(), &["bookmarks", "list"]));
    assert!(list.starts_with("@default -> "));
    assert!(list.contains("\n@work -> "));
    assert!(temp.path().join(".klog/bookmarks.json").exists());

    assert!(stdout(&run(temp.path(), &["total"])).starts_with("Total: 9h\n"));
    assert!(stdout(&run(temp.path(), &["total", "@work"])).starts_with("Total: 9h\n"));
}

#[test]
fn start_and_stop_round_trip() {
    let temp = TempDir::new().unwrap();
    let file = write_records(temp.path(), "time.klg", RECORDS);

    let started = stdout(&run(
        temp.path(),
        &[
            "start", &file, "--date", "2023-02-01", "--time", "13:00", "--summary", "Coding",
        ],
    ));
    assert_eq!(started, "Started 13:00 - ? on 2023-02-01\n");

    let again = run(
        temp.path(),
        &["start", &file, "--date", "2023-02-01", "--time", "14:00"],
    );
    assert!(!again.status.success());

    let stopped = stdout(&run(
        temp.path(),
        &["stop", &file, "--date", "2023-02-01", "--time", "14:15"],
    ));
    assert_eq!(stopped, "Stopped at 14:15 on 2023-02-01 (total 1h 45m)\n");

    let content = std::fs::read_to_string(temp.path().join("time.klg")).unwrap();
    assert!(content.ends_with("2023-02-01\n    30m\n    13:00 - 14:15 Coding\n"));

    assert!(stdout(&run(temp.path(), &["total", &file])).starts_with("Total: 10h 15m\n"));
}
