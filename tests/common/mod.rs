#![allow(dead_code)]

use loxwalk::config::{Config, Mode, Redeclaration};
use loxwalk::interpreter::{InterpretErr, Interpreter};

/// Runs `code` in `mode` and returns what it wrote alongside the outcome.
pub fn run_mode(mode: Mode, code: &str) -> (String, Result<(), InterpretErr>) {
    run_config(Config::new(mode), code)
}

pub fn run_config(config: Config, code: &str) -> (String, Result<(), InterpretErr>) {
    let mut interp = Interpreter::with_output(config, Vec::new());
    let res = interp.run(code);
    let out = String::from_utf8(interp.into_output()).expect("output is utf-8");
    (out, res)
}

/// Runs a full program and expects it to succeed.
pub fn run_ok(code: &str) -> String {
    let (out, res) = run_mode(Mode::Run, code);
    if let Err(err) = res {
        panic!("program failed: {err}\noutput so far:\n{out}");
    }
    out
}

pub fn run_err(code: &str) -> (String, InterpretErr) {
    let (out, res) = run_mode(Mode::Run, code);
    match res {
        Ok(()) => panic!("program unexpectedly succeeded with output:\n{out}"),
        Err(err) => (out, err),
    }
}

pub fn evaluate(code: &str) -> String {
    let (out, res) = run_mode(Mode::Evaluate, code);
    if let Err(err) = res {
        panic!("evaluation failed: {err}");
    }
    out
}

pub fn with_policy(policy: Redeclaration) -> Config {
    Config::new(Mode::Run).with_redeclaration(policy)
}
