//! End-to-end tests running the `gripe` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const TODO_RULE: &str = r#"
[[rule]]
name = "todo"
description = "unfinished"
pattern = "TODO"
glob = ["*.md"]
"#;

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, text) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
    dir
}

/// Runs `gripe` in `cwd` with no global config in reach.
fn gripe(cwd: &Path, args: &[&str]) -> Output {
    let global = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_gripe"))
        .current_dir(cwd)
        .env("GRIPE_CONFIG_DIR", global.path())
        .env_remove("GRIPE_CONFIG")
        .args(args)
        .output()
        .unwrap()
}

fn check(dir: &Path, extra: &[&str]) -> Output {
    let root = dir.to_str().unwrap();
    let mut args = vec!["check", "--analyze-dir", root, "--include-untracked"];
    args.extend_from_slice(extra);
    gripe(dir, &args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn critical_complaint_exits_one_with_full_context() {
    let dir = tree(&[
        ("gripe.toml", TODO_RULE),
        ("NOTES.md", "intro\nTODO: x\nend\n"),
    ]);
    let output = check(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));

    let expected = [
        "critical - todo: unfinished",
        " --> NOTES.md[2:1]",
        "     1| intro",
        "     2| TODO: x",
        "      | ^^^^",
        "     3| end",
        "",
        "1 Complaints found: 0 Warnings, 1 Critical.",
        "",
    ]
    .join("\n");
    assert_eq!(stdout(&output), expected);
}

#[test]
fn warnings_only_exit_zero() {
    let dir = tree(&[
        ("gripe.toml", &format!("{TODO_RULE}severity = \"warning\"\n")),
        ("NOTES.md", "TODO\n"),
    ]);
    let output = check(dir.path(), &["--inline"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "warning - todo: unfinished --> NOTES.md[1:1]\n\n1 Complaints found: 1 Warnings, 0 Critical.\n"
    );
}

#[test]
fn clean_run() {
    let dir = tree(&[("gripe.toml", TODO_RULE), ("NOTES.md", "done\n")]);
    let output = check(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "No complaints. Enjoy the rest of your day!\n");
}

#[test]
fn severity_override_from_rules_table() {
    let config = format!("{TODO_RULE}\n[rules.todo]\nseverity = \"warning\"\n");
    let dir = tree(&[("gripe.toml", &config), ("NOTES.md", "TODO\n")]);
    assert_eq!(check(dir.path(), &[]).status.code(), Some(0));
}

#[test]
fn negative_context_is_clamped() {
    let dir = tree(&[
        ("gripe.toml", TODO_RULE),
        ("NOTES.md", "intro\nTODO: x\nend\n"),
    ]);
    let output = check(dir.path(), &["-n", "-3"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with(
        "critical - todo: unfinished\n --> NOTES.md[2:1]\n     2| TODO: x\n      | ^^^^\n\n"
    ));
}

#[test]
fn invalid_pattern_exits_two() {
    let bad = "[[rule]]\nname = \"bad\"\npattern = \"(\"\nglob = [\"*\"]\n";
    let dir = tree(&[("gripe.toml", bad), ("a.txt", "x\n")]);
    let output = check(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn missing_root_exits_two() {
    let dir = tree(&[("gripe.toml", TODO_RULE)]);
    let missing = dir.path().join("nope");
    let output = gripe(
        dir.path(),
        &[
            "check",
            "--analyze-dir",
            missing.to_str().unwrap(),
            "--include-untracked",
            "--config",
            dir.path().join("gripe.toml").to_str().unwrap(),
        ],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_preset_exits_two() {
    let dir = tree(&[("a.py", "print(1)\n")]);
    let output = check(dir.path(), &["--preset", "strict"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn load_module_directory() {
    let dir = tree(&[
        ("rules/10-todo.toml", TODO_RULE),
        ("NOTES.md", "TODO\n"),
    ]);
    let rules = dir.path().join("rules");
    let output = check(
        dir.path(),
        &["--load-module", rules.to_str().unwrap(), "--inline"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("critical - todo: unfinished --> NOTES.md[1:1]"));
}

#[test]
fn empty_load_module_directory_exits_two() {
    let dir = tree(&[("app.py", "print(1)\n")]);
    let rules = dir.path().join("rules");
    fs::create_dir(&rules).unwrap();
    let output = check(
        dir.path(),
        &["--load-module", rules.to_str().unwrap(), "--inline"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "");
}

#[test]
fn config_without_rules_uses_python_preset() {
    let dir = tree(&[
        ("gripe.toml", "[scanner]\ncontext_lines = 0\n"),
        ("app.py", "print(1)\n"),
    ]);
    let output = check(dir.path(), &["--inline"]);
    assert_ne!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("easy-print"));
}

#[test]
fn builtin_preset_with_rule_filter() {
    let dir = tree(&[
        ("app.py", "print(1)\n# print(2)\n"),
        ("NOTES.md", "TODO\n"),
    ]);
    let output = check(
        dir.path(),
        &["--preset", "all", "--rules", "complex-print", "--inline"],
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "warning - complex-print: Print statements can slow down code. --> app.py[1:1]\n\n\
         1 Complaints found: 1 Warnings, 0 Critical.\n"
    );
}

#[test]
fn json_output() {
    let dir = tree(&[("gripe.toml", TODO_RULE), ("NOTES.md", "a\nTODO\n")]);
    let output = check(dir.path(), &["--format", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["critical"], 1);
    assert_eq!(report["summary"]["files_scanned"], 1);
    let complaint = &report["complaints"][0];
    assert_eq!(complaint["rule"], "todo");
    assert_eq!(complaint["files"][0]["spans"][0]["start"], 2);
    assert_eq!(complaint["files"][0]["spans"][0]["end"], 6);
}

#[test]
fn list_rules() {
    let dir = TempDir::new().unwrap();
    let output = gripe(dir.path(), &["list-rules"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    for name in ["easy-print", "readme-reference", "use-pformat", "todo-in-docs"] {
        assert!(text.contains(name), "{name} missing from:\n{text}");
    }
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    assert_eq!(gripe(dir.path(), &["init"]).status.code(), Some(0));
    assert!(dir.path().join("gripe.toml").is_file());

    assert_eq!(gripe(dir.path(), &["init"]).status.code(), Some(2));
    assert_eq!(gripe(dir.path(), &["init", "--force"]).status.code(), Some(0));
}
