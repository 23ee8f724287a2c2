//! CLI integration tests for `pseudoc translate`, `tokens` and `ast`.
//!
//! These tests invoke the compiled binary to verify end-to-end behavior.

use std::io::Write;
use std::process::{Command, Stdio};

fn pseudoc_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pseudoc"))
}

#[test]
fn cli_translate_to_stdout() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = dir.path().join("loop.pseudo");
    std::fs::write(
        &file,
        r#"
        Declare x As Integer
        For i = 0 To 5 Do
            Assign x = i * 2
        End For
        "#,
    )
    .expect("write source");

    let output = pseudoc_bin()
        .args(["translate", file.to_str().unwrap()])
        .output()
        .expect("run binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "translate should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.starts_with("#include <bits/stdc++.h>\n"));
    assert!(stdout.contains("    int x;\n"));
    assert!(stdout.contains("    for (int i = 0 ; i <= 5 ; i++) {\n        x = i * 2 ;\n    }\n"));
}

#[test]
fn cli_translate_to_output_file() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let source = dir.path().join("hello.pseudo");
    let target = dir.path().join("hello.cpp");
    std::fs::write(&source, "Print \"Hello\"").expect("write source");

    let output = pseudoc_bin()
        .args([
            "translate",
            source.to_str().unwrap(),
            "--output",
            target.to_str().unwrap(),
        ])
        .output()
        .expect("run binary");

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "nothing on stdout with --output");
    let cpp = std::fs::read_to_string(&target).expect("read output");
    assert!(cpp.contains("cout << \"Hello\" << endl;"));
}

#[test]
fn cli_translate_from_stdin() {
    let mut child = pseudoc_bin()
        .args(["translate", "-", "--indent", "2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn binary");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"Assign x = 5")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\n  x = 5 ;\n"), "stdout: {}", stdout);
}

#[test]
fn cli_syntax_error_reports_location_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let source = dir.path().join("bad.pseudo");
    let target = dir.path().join("bad.cpp");
    std::fs::write(&source, "Assign x = 1\nIf x > 0 Then\n  Print x\n").expect("write source");

    let output = pseudoc_bin()
        .args([
            "translate",
            source.to_str().unwrap(),
            "-o",
            target.to_str().unwrap(),
        ])
        .output()
        .expect("run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(":2:1: syntax error: missing `End If`"), "stderr: {}", stderr);
    assert!(!target.exists(), "no output on failure");
}

#[test]
fn cli_strict_rejects_stray_semicolon() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let source = dir.path().join("semi.pseudo");
    std::fs::write(&source, "Assign x = 1;").expect("write source");

    let lenient = pseudoc_bin()
        .args(["translate", source.to_str().unwrap()])
        .output()
        .expect("run binary");
    assert!(lenient.status.success());

    let strict = pseudoc_bin()
        .args(["translate", source.to_str().unwrap(), "--strict"])
        .output()
        .expect("run binary");
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("unrecognized character ';'"), "stderr: {}", stderr);
}

#[test]
fn cli_tokens_json() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let source = dir.path().join("decl.pseudo");
    std::fs::write(&source, "Declare x As Integer").expect("write source");

    let output = pseudoc_bin()
        .args(["tokens", source.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let toks: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON");
    let toks = toks.as_array().expect("array of tokens");
    assert_eq!(toks.len(), 5);
    assert_eq!(toks[0]["kind"], "KwDeclare");
    assert_eq!(toks[1]["lexeme"], "x");
    assert_eq!(toks[4]["kind"], "Eof");
}

#[test]
fn cli_ast_json() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let source = dir.path().join("if.pseudo");
    std::fs::write(&source, "If x > 0 Then Print x End If").expect("write source");

    let output = pseudoc_bin()
        .args(["ast", source.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let root: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(root["kind"], "Program");
    let if_ = &root["children"][0];
    assert_eq!(if_["kind"], "IfStatement");
    assert_eq!(if_["children"].as_array().map(|c| c.len()), Some(3));
    assert_eq!(if_["children"][2]["children"].as_array().map(|c| c.len()), Some(0));
}

#[test]
fn cli_missing_file_fails() {
    let output = pseudoc_bin()
        .args(["translate", "/definitely/not/here.pseudo"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}
