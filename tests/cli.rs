use std::fs;
use std::process::{Command, Output};
use tempfile::tempdir;

fn loxwalk() -> Command {
    Command::new(env!("CARGO_BIN_EXE_loxwalk"))
}

fn run(args: &[&str], name: &str, code: &str) -> Output {
    let dir = tempdir().unwrap();
    let path = dir.path().join(format!("{name}.lox"));
    fs::write(&path, code).unwrap();

    loxwalk()
        .env_remove("RUST_LOG")
        .args(args)
        .arg(&path)
        .output()
        .expect("Failed to execute loxwalk")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn run_prints_and_exits_zero() {
    let output = run(&["run"], "run", "var x = 10;\nprint x + 5;\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "15\n");
    assert_eq!(stderr(&output), "");
}

#[test]
fn tokenize_listing() {
    let output = run(&["tokenize"], "tokenize", "(\"hi\" 12)");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "LEFT_PAREN ( null\nSTRING \"hi\" hi\nNUMBER 12 12.0\nRIGHT_PAREN ) null\nEOF  null\n"
    );
}

#[test]
fn tokenize_errors_exit_65() {
    let output = run(&["tokenize"], "tokenize-err", "@");
    assert_eq!(output.status.code(), Some(65));
    assert_eq!(stdout(&output), "EOF  null\n");
    assert!(stderr(&output).contains("[line 1] Error: Unexpected character: @"));
}

#[test]
fn parse_prints_sexpressions() {
    let output = run(&["parse"], "parse", "1 + 2 * 3");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "(+ 1.0 (* 2.0 3.0))\n");
}

#[test]
fn parse_error_exits_65() {
    let output = run(&["parse"], "parse-err", "(1 + 2");
    assert_eq!(output.status.code(), Some(65));
    assert!(stderr(&output).contains("[line 1] Error at end: Expect ')' after expression."));
}

#[test]
fn evaluate_prints_values() {
    let output = run(&["evaluate"], "evaluate", "10 / 4");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "2.5\n");
}

#[test]
fn runtime_errors_exit_70() {
    let output = run(&["run"], "runtime-err", "print -true;");
    assert_eq!(output.status.code(), Some(70));
    assert!(stderr(&output).contains("[line 1] Error: Operand must be a number."));

    let output = run(&["run"], "div-zero", "print 1 / 0;");
    assert_eq!(output.status.code(), Some(70));
    assert!(stderr(&output).contains("Division by zero."));
}

#[test]
fn missing_semicolon_in_run_mode() {
    let output = run(&["run"], "no-semi", "print 1");
    assert_eq!(output.status.code(), Some(65));
    assert!(stderr(&output).contains("Expect ';' after value."));
}

#[test]
fn redeclaration_policy_flag() {
    let code = "var a = 1;\nvar a = 2;\nprint a;";

    let output = run(&["--redeclaration", "deny", "run"], "deny", code);
    assert_eq!(output.status.code(), Some(65));
    assert!(stderr(&output).contains("redeclared in the same scope"));

    let output = run(&["--redeclaration", "warn", "run"], "warn", code);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "2\n");
    assert!(stderr(&output).contains("redeclared in the same scope"));
}

#[test]
fn unreadable_file_exits_1() {
    let output = loxwalk()
        .args(["run", "/definitely/not/here.lox"])
        .output()
        .expect("Failed to execute loxwalk");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error reading file"));
}

#[test]
fn usage_errors_exit_1() {
    let output = loxwalk()
        .arg("frobnicate")
        .output()
        .expect("Failed to execute loxwalk");
    assert_eq!(output.status.code(), Some(1));

    let output = loxwalk()
        .arg("run")
        .output()
        .expect("Failed to execute loxwalk");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn version_flag() {
    let output = loxwalk()
        .arg("--version")
        .output()
        .expect("Failed to execute loxwalk");
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn deep_nesting_exits_65() {
    let code = "(".repeat(5000) + "1" + &")".repeat(5000);
    let output = run(&["evaluate"], "deep", &code);
    assert_eq!(output.status.code(), Some(65));
    assert!(stderr(&output).contains("Too much nesting."));

    let code = format!("print {}1;", "-".repeat(20_000));
    let output = run(&["run"], "negations", &code);
    assert_eq!(output.status.code(), Some(65));
}
