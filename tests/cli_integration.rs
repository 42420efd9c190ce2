//! Integration tests for the `lanes` CLI.
//!
//! Each test creates a temp workspace, runs `lanes` as a subprocess,
//! and verifies stdout and/or document contents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Get the path to the built `lanes` binary.
fn lanes_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lanes"))
}

const CONFIG: &str = r#"[board]
file = "board.md"
columns = ["todo", "doing"]
"#;

const BOARD: &str = "\
# Board

- [ ] buy milk #todo
- [ ] walk dog #todo
- [ ] fix login #bug #doing
- [x] ship release #doing
- [ ] old idea #archived
";

/// Create a minimal test workspace in the given directory.
fn create_test_workspace(root: &Path) {
    fs::write(root.join(".lanes.toml"), CONFIG).unwrap();
    fs::write(root.join("board.md"), BOARD).unwrap();
}

fn read(root: &Path, doc: &str) -> String {
    fs::read_to_string(root.join(doc)).unwrap()
}

/// Run `lanes` with the given args in the given directory, returning (stdout, stderr, success).
fn run_lanes(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(lanes_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("LANES_LOG")
        .output()
        .expect("failed to run lanes");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `lanes` expecting success, return stdout.
fn run_lanes_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_lanes(dir, args);
    if !success {
        panic!(
            "lanes {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `lanes` with `input` on stdin, expecting success.
fn run_lanes_with_input(dir: &Path, args: &[&str], input: &str) -> String {
    let mut child = Command::new(lanes_bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run lanes");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "lanes {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_then_add() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_lanes_ok(
        tmp.path(),
        &["init", "--board", "projects/board.md", "--column", "backlog", "--column", "now"],
    );
    assert!(tmp.path().join(".lanes.toml").is_file());
    assert_eq!(read(tmp.path(), "projects/board.md"), "# Board\n\n");

    run_lanes_ok(tmp.path(), &["config", "set", "default-task-path", "inbox"]);
    run_lanes_ok(tmp.path(), &["add", "now"]);
    assert!(read(tmp.path(), "projects/inbox.md").ends_with("- [ ]  #now"));
}

#[test]
fn test_init_twice_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_lanes_ok(tmp.path(), &["init"]);
    let (_, stderr, success) = run_lanes(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_outside_workspace_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_lanes(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("not a lanes workspace"));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_lanes_ok(tmp.path(), &["list"]);
    assert!(out.contains("board.md:2 [ ] buy milk -> todo"));
    assert!(out.contains("board.md:4 [ ] fix login #bug -> doing"));
    assert!(!out.contains("old idea"));

    let out = run_lanes_ok(tmp.path(), &["list", "--all"]);
    assert!(out.contains("old idea (archived)"));

    let out = run_lanes_ok(tmp.path(), &["list", "--column", "doing"]);
    assert!(out.contains("fix login"));
    assert!(!out.contains("buy milk"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_lanes_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 4);
    assert_eq!(arr[0]["id"], "board.md:2");
    assert_eq!(arr[0]["document"], "board.md");
    assert_eq!(arr[0]["row"], 2);
    assert_eq!(arr[0]["column"], "todo");
    assert_eq!(arr[2]["tags"][0], "bug");
}

#[test]
fn test_board() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_lanes_ok(tmp.path(), &["board", "--width", "20"]);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("Uncategorised (0)"));
    assert!(lines[0].contains("todo (2)"));
    assert!(lines[0].contains("doing (1)"));
    assert!(lines[0].contains("Done (1)"));
    assert!(out.contains("ship release"));
    assert!(!out.contains("old idea"));
}

#[test]
fn test_board_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_lanes_ok(tmp.path(), &["board", "--json"]);
    let lanes: serde_json::Value = serde_json::from_str(&out).unwrap();
    let titles: Vec<&str> = lanes
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Uncategorised", "todo", "doing", "Done"]);
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_move() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_lanes_ok(tmp.path(), &["move", "board.md:3", "doing"]);
    assert_eq!(out.trim(), "board.md:3 -> doing");
    assert_eq!(
        read(tmp.path(), "board.md"),
        BOARD.replace("walk dog #todo", "walk dog #doing")
    );
}

#[test]
fn test_move_dry_run_writes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_lanes_ok(tmp.path(), &["move", "board.md:4", "todo", "--dry-run"]);
    assert_eq!(out.trim(), "- [ ] fix login #bug #todo");
    assert_eq!(read(tmp.path(), "board.md"), BOARD);
}

#[test]
fn test_move_rejects_unwritable_column() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    for column in ["in review", "#doing", "archived"] {
        let (_, stderr, success) = run_lanes(tmp.path(), &["move", "board.md:2", column]);
        assert!(!success, "move to {:?} succeeded", column);
        assert!(stderr.contains("error:"), "{}", stderr);
    }
    assert_eq!(read(tmp.path(), "board.md"), BOARD);
}

#[test]
fn test_edit_with_newline_keeps_one_line() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_lanes_ok(tmp.path(), &["edit", "board.md:2", "buy milk\nand eggs"]);
    let text = read(tmp.path(), "board.md");
    assert_eq!(text.lines().count(), BOARD.lines().count());
    assert!(text.contains("- [ ] buy milk and eggs #todo\n- [ ] walk dog #todo\n"));
}

#[test]
fn test_missing_id_is_silent() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    for args in [
        vec!["move", "board.md:99", "doing"],
        vec!["done", "nope.md:0"],
        vec!["edit", "board.md:0", "x"],
        vec!["delete", "board.md:1"],
        vec!["archive", "nope.md:0"],
    ] {
        let out = run_lanes_ok(tmp.path(), &args);
        assert_eq!(out, "", "{:?} printed output", args);
    }
    assert_eq!(read(tmp.path(), "board.md"), BOARD);
}

#[test]
fn test_done_and_edit() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_lanes_ok(tmp.path(), &["done", "board.md:2"]);
    run_lanes_ok(tmp.path(), &["edit", "board.md:4", "  fix logout  "]);

    let text = read(tmp.path(), "board.md");
    assert!(text.contains("- [x] buy milk #todo\n"));
    assert!(text.contains("- [ ] fix logout #bug #doing\n"));
}

#[test]
fn test_archive_many() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_lanes_ok(tmp.path(), &["archive", "board.md:2", "missing:1", "board.md:5"]);
    assert_eq!(out, "board.md:2 archived\nboard.md:5 archived\n");

    let text = read(tmp.path(), "board.md");
    assert!(text.contains("- [ ] buy milk #archived\n"));
    assert!(text.contains("- [x] ship release #archived\n"));
    assert!(text.contains("- [ ] walk dog #todo\n"));
}

#[test]
fn test_delete_and_recovery() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_lanes_ok(tmp.path(), &["delete", "board.md:2"]);
    assert_eq!(
        read(tmp.path(), "board.md"),
        BOARD.replace("- [ ] buy milk #todo\n", "")
    );

    let out = run_lanes_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("- [ ] buy milk #todo"));
    assert!(out.contains("board.md:2"));

    let out = run_lanes_ok(tmp.path(), &["recovery", "--json"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(entries[0]["category"], "delete");

    let out = run_lanes_ok(tmp.path(), &["recovery", "prune", "--all"]);
    assert_eq!(out.trim(), "pruned 1 entries");
    let out = run_lanes_ok(tmp.path(), &["recovery"]);
    assert_eq!(out.trim(), "recovery log is empty");
}

#[test]
fn test_workspace_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());
    let other = tempfile::TempDir::new().unwrap();

    let ws = tmp.path().to_str().unwrap();
    run_lanes_ok(other.path(), &["-C", ws, "done", "board.md:3"]);
    assert!(read(tmp.path(), "board.md").contains("- [x] walk dog #todo"));
}

#[test]
fn test_discovers_workspace_from_subfolder() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());
    fs::create_dir_all(tmp.path().join("notes/deep")).unwrap();

    let out = run_lanes_ok(&tmp.path().join("notes/deep"), &["list"]);
    assert!(out.contains("buy milk"));
}

#[test]
fn test_view_launches_editor_at_row() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let output = Command::new(lanes_bin())
        .args(["view", "board.md:3"])
        .current_dir(tmp.path())
        .env_remove("VISUAL")
        .env("EDITOR", "echo")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("+4 "));
    assert!(stdout.trim_end().ends_with("board.md"));
    assert_eq!(read(tmp.path(), "board.md"), BOARD);
}

// ---------------------------------------------------------------------------
// Task creation
// ---------------------------------------------------------------------------

#[test]
fn test_add_with_default_path_creates_document() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("projects")).unwrap();
    fs::write(
        tmp.path().join(".lanes.toml"),
        "[board]\nfile = \"projects/board.md\"\ncolumns = [\"todo\", \"doing\"]\ndefault_task_path = \"tasks/inbox\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("projects/board.md"), "# Board\n").unwrap();

    let out = run_lanes_ok(tmp.path(), &["add", "doing"]);
    assert_eq!(out.trim(), "added to projects/tasks/inbox.md (doing)");
    assert!(tmp.path().join("projects/tasks").is_dir());
    let text = read(tmp.path(), "projects/tasks/inbox.md");
    assert_eq!(text.split('\n').last(), Some("- [ ]  #doing"));
}

#[test]
fn test_add_with_absolute_default_path() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());
    run_lanes_ok(tmp.path(), &["config", "set", "default-task-path", "/inbox.md"]);

    let out = run_lanes_ok(tmp.path(), &["config", "get", "default-task-path"]);
    assert_eq!(out.trim(), "/inbox.md");

    let out = run_lanes_ok(tmp.path(), &["add", "todo", "--json"]);
    let added: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(added["document"], "inbox.md");
    assert_eq!(read(tmp.path(), "inbox.md"), "\n- [ ]  #todo");
}

#[test]
fn test_add_with_chooser() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());
    fs::create_dir_all(tmp.path().join("notes")).unwrap();
    fs::write(tmp.path().join("notes/ideas.md"), "- [ ] a #todo").unwrap();

    // Menu: 1) board.md 2) notes/ ; then 1) ideas.md
    let out = run_lanes_with_input(tmp.path(), &["add", "doing"], "2\n1\n");
    assert_eq!(out.trim(), "added to notes/ideas.md (doing)");
    assert_eq!(read(tmp.path(), "notes/ideas.md"), "- [ ] a #todo\n- [ ]  #doing");
    assert_eq!(read(tmp.path(), "board.md"), BOARD);
}

#[test]
fn test_add_chooser_cancelled() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_lanes_with_input(tmp.path(), &["add", "doing"], "q\n");
    assert_eq!(out, "");
    assert_eq!(read(tmp.path(), "board.md"), BOARD);
}
