//! CLI tests for `check`, the batch round-trip command.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn cli() -> Command {
    Command::new(cargo::cargo_bin!("sheet-history"))
}

fn write_temp_fragments(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fragments.txt");
    fs::write(&path, content).expect("write fragments");
    (dir, path.to_string_lossy().to_string())
}

fn check_json(content: &str, extra: &[&str]) -> (std::process::Output, serde_json::Value) {
    let (_dir, path) = write_temp_fragments(content);
    let output = cli()
        .args(["check", &path, "--output", "json"])
        .args(extra)
        .output()
        .expect("run check");
    let json = serde_json::from_slice(&output.stdout).expect("valid json");
    (output, json)
}

const GOOD: &str = "\
# spreadsheet list and tokens
/
/*/offset/10/count/20
/1/Untitled
/1/Untitled/cell/A1/formula/save/=1+2
/1/Untitled/cell/B2:C3/bottom-right/menu

/1/Untitled/column/A:C/right/hide
/1/Untitled/row/4/insert-after/2
/1/Untitled/label/Total/save/A1:B2
/1/Untitled/metadata/locale
/plugin/*
";

#[test]
fn good_file_passes() {
    let (output, json) = check_json(GOOD, &[]);
    assert!(output.status.success(), "stdout={}", String::from_utf8_lossy(&output.stdout));
    assert_eq!(json["ok"], true);
    assert_eq!(json["checked"], 10);
    assert_eq!(json["failures"].as_array().map(Vec::len), Some(0));
}

#[test]
fn non_canonical_input_still_passes() {
    // Ranges without an anchor print one; the printed form is stable.
    let (output, json) = check_json("/1/Untitled/cell/A1:B2\n/*/count/5/offset/1\n", &[]);
    assert!(output.status.success());
    assert_eq!(json["checked"], 2);
}

#[test]
fn unparseable_lines_are_reported_with_line_numbers() {
    let (output, json) = check_json("/1/Untitled\nbad\n\n/xyz/Untitled\n", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["ok"], false);
    assert_eq!(json["checked"], 3);

    let failures = json["failures"].as_array().expect("failures");
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0]["line"], 2);
    assert_eq!(failures[0]["reason"], "not understood");
    assert_eq!(failures[0]["diagnostics"][0]["id"], "HIST1002");
    assert_eq!(failures[1]["line"], 4);
    assert_eq!(failures[1]["diagnostics"][0]["id"], "HIST1201");
}

#[test]
fn warnings_fail_only_in_strict_mode() {
    let content = "/1/Untitled/spreadsheet-thing\n";

    let (output, json) = check_json(content, &[]);
    assert!(output.status.success());
    assert_eq!(json["ok"], true);

    let (output, json) = check_json(content, &["--strict"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["failures"][0]["reason"], "partially understood");
    assert_eq!(json["failures"][0]["canonical"], "/1/Untitled");
}

#[test]
fn pretty_output_names_file_and_line() {
    let (_dir, path) = write_temp_fragments("/1/Untitled\nnope\n");
    let output = cli()
        .args(["check", &path, "--output", "pretty"])
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!("{path}:2")), "stderr={stderr}");
    assert!(stderr.contains("checked 2 fragments, 1 failed"), "stderr={stderr}");
}
