//! End-to-end tests of the `goxc` binary: exit codes, diagnostics on
//! stderr, and program output on stdout.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Writes a source snippet to a temp file and returns its handle.
fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(source.as_bytes())
        .expect("failed to write source");
    file
}

fn goxc() -> Command {
    Command::cargo_bin("goxc").expect("goxc binary builds")
}

#[test]
fn test_no_arguments_is_usage_error() {
    goxc()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("usage"));
}

#[test]
fn test_missing_file_is_usage_error() {
    goxc()
        .arg("definitely/not/a/file.gox")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let file = source_file("print 1;");
    goxc()
        .arg("--emit-everything")
        .arg(file.path())
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_runs_program_and_prints() {
    let file = source_file("print 2+3*4-5;");
    goxc()
        .arg(file.path())
        .assert()
        .success()
        .stdout("9\n");
}

#[test]
fn test_char_output_has_no_newline() {
    let file = source_file("print 'A';");
    goxc().arg(file.path()).assert().success().stdout("A");
}

#[test]
fn test_while_program() {
    let file = source_file("var i int = 0; while i<3 { print i; i = i+1; }");
    goxc()
        .arg(file.path())
        .assert()
        .success()
        .stdout("0\n1\n2\n");
}

#[test]
fn test_recursive_program() {
    let file = source_file(
        "func f(n int) int { if n<2 { return n; } else {} return f(n-1)+f(n-2); } print f(7);",
    );
    goxc().arg(file.path()).assert().success().stdout("13\n");
}

#[test]
fn test_lexical_error_exits_65() {
    let file = source_file("var x int = 1; @");
    goxc()
        .arg(file.path())
        .assert()
        .failure()
        .code(65)
        .stderr(predicate::str::contains("unexpected character"));
}

#[test]
fn test_syntax_error_exits_66() {
    let file = source_file("print 1");
    goxc()
        .arg(file.path())
        .assert()
        .failure()
        .code(66)
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn test_semantic_error_exits_67_without_running() {
    let file = source_file("const c int = 1; c = 2; print 1;");
    goxc()
        .arg(file.path())
        .assert()
        .failure()
        .code(67)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("const"));
}

#[test]
fn test_runtime_error_exits_70() {
    let file = source_file("var z int = 0; print 1 / z;");
    goxc()
        .arg(file.path())
        .assert()
        .failure()
        .code(70)
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn test_emit_tokens() {
    let file = source_file("var x int = 1;");
    goxc()
        .arg("--emit-tokens")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Var").and(predicate::str::contains("Ident")));
}

#[test]
fn test_emit_ast() {
    let file = source_file("print 1+2;");
    goxc()
        .arg("--emit-ast")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Print").and(predicate::str::contains("Binary")));
}

#[test]
fn test_emit_ir() {
    let file = source_file("var x int = 1; print x;");
    goxc()
        .arg("--emit-ir")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("func main() -> I")
                .and(predicate::str::contains("GLOBAL_SET x"))
                .and(predicate::str::contains("RET")),
        );
}

#[test]
fn test_emit_ir_still_reports_semantic_errors() {
    let file = source_file("x = 1;");
    goxc()
        .arg("--emit-ir")
        .arg(file.path())
        .assert()
        .failure()
        .code(67)
        .stderr(predicate::str::contains("undeclared"));
}

#[test]
fn test_multiple_lexical_errors_are_all_reported() {
    let file = source_file("var @ int = $;");
    let output = goxc().arg(file.path()).assert().failure().code(65);
    let stderr = String::from_utf8_lossy(&output.get_output().stderr).to_string();
    assert!(stderr.matches("unexpected character").count() >= 2, "stderr: {stderr}");
}
