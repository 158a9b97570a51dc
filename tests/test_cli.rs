use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::{TempDir, tempdir};

const COMMANDS_HTML: &str = include_str!("fixtures/commands.html");

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_shortcut-filter")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

fn fixture() -> (TempDir, PathBuf) {
    let dir = tempdir().expect("temp dir");
    let doc = dir.path().join("commands.html");
    write_file(&doc, COMMANDS_HTML);
    (dir, doc)
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .arg("--color")
        .arg("never")
        .args(args)
        .output()
        .expect("command should run")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_filter_prints_matching_rows() {
    let (_dir, doc) = fixture();
    let output = run(&["filter", doc.to_str().expect("utf8 path"), "--ids", "zoom"]);
    let text = stdout(&output);

    assert!(text.contains("SHOWING 2 of 9 rows"), "got:\n{text}");
    assert!(text.contains("CmdZoomIn"));
    assert!(text.contains("CmdZoomOut"));
    assert!(!text.contains("CmdOpenFile"));
}

#[test]
fn test_filter_count_only() {
    let (_dir, doc) = fixture();
    let output = run(&[
        "filter",
        doc.to_str().expect("utf8 path"),
        "--palette",
        "open recent file",
        "--count",
    ]);
    assert_eq!(stdout(&output).trim(), "1");
}

#[test]
fn test_filter_json_output_written_to_file() {
    let (dir, doc) = fixture();
    let out = dir.path().join("out.json");
    let output = run(&[
        "-F",
        "json",
        "-o",
        out.to_str().expect("utf8 path"),
        "filter",
        doc.to_str().expect("utf8 path"),
        "--keys",
        "ctrl+a",
    ]);
    stdout(&output);

    let content = fs::read_to_string(&out).expect("output file should exist");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["filter"]["total_rows"], 9);
    assert_eq!(value["filter"]["visible_rows"], 1);
    assert_eq!(value["filter"]["rows"][0]["command_id"], "CmdSelectAll");
    assert_eq!(value["filter"]["inputs"]["key_shortcut"], "ctrl+a");
}

#[test]
fn test_missing_inputs_fail_at_startup() {
    let dir = tempdir().expect("temp dir");
    let doc = dir.path().join("bare.html");
    write_file(
        &doc,
        r#"<table class="collection-content"><tr><td>CmdA</td><td>F1</td><td>A</td></tr></table>"#,
    );

    let output = run(&["filter", doc.to_str().expect("utf8 path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cmd_ids"), "stderr: {stderr}");
}

#[test]
fn test_config_can_disable_input_check() {
    let dir = tempdir().expect("temp dir");
    let doc = dir.path().join("bare.html");
    let config = dir.path().join("filter.toml");
    write_file(
        &doc,
        r#"<table class="shortcuts"><tr><td>CmdA</td><td>F1</td><td>A</td></tr></table>"#,
    );
    write_file(&config, "table_class = \"shortcuts\"\nrequire_inputs = false\n");

    let output = run(&[
        "-c",
        config.to_str().expect("utf8 path"),
        "filter",
        doc.to_str().expect("utf8 path"),
        "--count",
    ]);
    assert_eq!(stdout(&output).trim(), "1");
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("filter.toml");
    write_file(&config, "[columns]\ncommand_id = 2\n");
    let (_doc_dir, doc) = fixture();

    let output = run(&[
        "-c",
        config.to_str().expect("utf8 path"),
        "info",
        doc.to_str().expect("utf8 path"),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("column position 2"));
}

#[test]
fn test_info_json() {
    let (_dir, doc) = fixture();
    let output = run(&["-F", "json", "info", doc.to_str().expect("utf8 path")]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");

    assert_eq!(value["info"]["rows"], 9);
    assert_eq!(value["info"]["bindings"][1]["filter"], "key_shortcut");
    assert_eq!(value["info"]["bindings"][1]["found"], true);
}

#[test]
fn test_replay_from_stdin() {
    let (_dir, doc) = fixture();
    let mut child = Command::new(bin())
        .args(["--color", "never", "replay", doc.to_str().expect("utf8 path")])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("command should start");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(b"# type a command id\ncmd_ids=zo\ncmd_ids=zoom\ncmd_plt=zoom o\ncmd_ids=\n")
        .expect("write events");
    let output = child.wait_with_output().expect("command should finish");
    let text = stdout(&output);

    assert!(text.contains("REPLAY 4 events"), "got:\n{text}");
    assert!(text.contains("cmd_ids=\"zoom\" -> 2/9"), "got:\n{text}");
    assert!(text.contains("cmd_plt=\"zoom o\" -> 1/9"), "got:\n{text}");
    assert!(text.contains("cmd_ids=\"\" -> 1/9"), "got:\n{text}");
}

#[test]
fn test_replay_rejects_unknown_input() {
    let (dir, doc) = fixture();
    let events = dir.path().join("events.txt");
    write_file(&events, "search=zoom\n");

    let output = run(&[
        "replay",
        doc.to_str().expect("utf8 path"),
        "--events",
        events.to_str().expect("utf8 path"),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("search"));
}
