use loxwalk::expr::{BinaryOp, Expr};
use loxwalk::parser::{Location, ParseErr, ParseErrType, Parser, MAX_DEPTH};
use loxwalk::scanner::scan;
use loxwalk::statement::Stmt;
use pretty_assertions::assert_eq;

fn parse(code: &str, strict: bool) -> Result<Vec<Stmt>, ParseErr> {
    let (tokens, errs) = scan(code);
    assert!(errs.is_empty(), "scan errors: {errs:?}");
    Parser::new(&tokens, strict).parse()
}

fn sexprs(code: &str) -> Vec<String> {
    parse(code, false)
        .unwrap_or_else(|err| panic!("{err}"))
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn error(code: &str, strict: bool) -> String {
    parse(code, strict)
        .expect_err("parse should fail")
        .to_string()
}

#[test]
fn precedence() {
    assert_eq!(sexprs("1 + 2 * 3"), vec!["(+ 1.0 (* 2.0 3.0))"]);
    assert_eq!(sexprs("1 * 2 + 3"), vec!["(+ (* 1.0 2.0) 3.0)"]);
    assert_eq!(sexprs("1 < 2 == true"), vec!["(== (< 1.0 2.0) true)"]);
    assert_eq!(sexprs("-1 * !x"), vec!["(* (- 1.0) (! x))"]);
}

#[test]
fn left_associative() {
    assert_eq!(sexprs("1 - 2 - 3"), vec!["(- (- 1.0 2.0) 3.0)"]);
    assert_eq!(sexprs("8 / 4 / 2"), vec!["(/ (/ 8.0 4.0) 2.0)"]);
    assert_eq!(sexprs("1 != 2 == 3"), vec!["(== (!= 1.0 2.0) 3.0)"]);
}

#[test]
fn grouping_is_kept() {
    assert_eq!(sexprs("(1 + 2)"), vec!["(group (+ 1.0 2.0))"]);
    assert_eq!(sexprs("((true))"), vec!["(group (group true))"]);
    assert_eq!(sexprs("-(-3)"), vec!["(- (group (- 3.0)))"]);
    assert_eq!(sexprs("!!false"), vec!["(! (! false))"]);
}

#[test]
fn literals() {
    assert_eq!(
        sexprs("nil true \"hi there\" 10 1.50"),
        vec!["nil", "true", "hi there", "10.0", "1.5"]
    );
}

#[test]
fn binary_node_shape() {
    let program = parse("\n2 + 3", false).unwrap();
    assert_eq!(
        program,
        vec![Stmt::Expr(Box::new(Expr::Binary(
            BinaryOp::Add,
            Box::new(Expr::Number(2.0, "2.0".into())),
            Box::new(Expr::Number(3.0, "3.0".into())),
            2,
        )))]
    );
}

#[test]
fn statements() {
    assert_eq!(
        sexprs("print 1; var a = 2; var b; { a; print b; } a = b = 3;"),
        vec![
            "(print 1.0)",
            "(var a 2.0)",
            "(var b)",
            "(block a (print b))",
            "(= a (= b 3.0))",
        ]
    );
}

#[test]
fn semicolons_optional_when_lenient() {
    assert_eq!(sexprs("print 1\nprint 2"), vec!["(print 1.0)", "(print 2.0)"]);
    assert_eq!(sexprs("1 + 2;"), vec!["(+ 1.0 2.0)"]);
}

#[test]
fn semicolons_required_when_strict() {
    assert_eq!(
        error("print 1", true),
        "[line 1] Error at end: Expect ';' after value."
    );
    assert_eq!(
        error("var a = 1\nprint a;", true),
        "[line 2] Error at 'print': Expect ';' after variable declaration."
    );
    assert_eq!(
        error("1 + 2", true),
        "[line 1] Error at end: Expect ';' after expression."
    );
    assert!(parse("{ var a = 1; print a; }", true).is_ok());
}

#[test]
fn missing_expression() {
    assert_eq!(
        error("+ 1", false),
        "[line 1] Error at '+': Expect expression."
    );
    assert_eq!(error("1 +", false), "[line 1] Error at end: Expect expression.");
    assert_eq!(
        error("print 1;\n\nprint );", true),
        "[line 3] Error at ')': Expect expression."
    );
}

#[test]
fn unclosed_delimiters() {
    assert_eq!(
        error("(1 + 2", false),
        "[line 1] Error at end: Expect ')' after expression."
    );
    assert_eq!(
        error("(1 2)", false),
        "[line 1] Error at '2': Expect ')' after expression."
    );
    assert_eq!(
        error("{ print 1;", true),
        "[line 1] Error at end: Expect '}' after block."
    );
}

#[test]
fn variable_name_required() {
    let err = parse("var 1 = 2;", true).unwrap_err();
    assert_eq!(err.data, ParseErrType::ExpectedToken("variable name"));
    assert_eq!(err.location, Location::Lexeme("1".into()));
    assert_eq!(err.to_string(), "[line 1] Error at '1': Expect variable name.");
}

#[test]
fn invalid_assignment_target() {
    assert_eq!(
        error("1 = 2", false),
        "[line 1] Error at '=': Invalid assignment target."
    );
    assert_eq!(
        error("(a) = 2", false),
        "[line 1] Error at '=': Invalid assignment target."
    );
}

#[test]
fn empty_program() {
    assert_eq!(parse("", true).unwrap(), Vec::<Stmt>::new());
    assert_eq!(parse("// nothing here", true).unwrap(), Vec::<Stmt>::new());
}

#[test]
fn number_literals_print_as_scanned() {
    assert_eq!(
        sexprs("1.12345678901234567890 100 2.500"),
        vec!["1.1234567890123456789", "100.0", "2.5"]
    );
}

#[test]
fn nesting_within_limit() {
    let depth = MAX_DEPTH - 1;
    let code = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert!(parse(&code, false).is_ok());

    let code = format!("{}1", "-".repeat(depth));
    assert!(parse(&code, false).is_ok());
}

#[test]
fn too_much_nesting() {
    let depth = MAX_DEPTH + 1;
    let groups = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let err = parse(&groups, false).unwrap_err();
    assert_eq!(err.data, ParseErrType::TooDeep);
    assert_eq!(err.to_string(), "[line 1] Error at '(': Too much nesting.");

    let negations = format!("print {}1;", "-".repeat(20_000));
    assert_eq!(
        error(&negations, true),
        "[line 1] Error at '-': Too much nesting."
    );

    let blocks = format!("{}{}", "{".repeat(depth + 1), "}".repeat(depth + 1));
    assert_eq!(error(&blocks, true), "[line 1] Error at '{': Too much nesting.");

    let assignments = format!("{}1", "a = ".repeat(depth + 1));
    assert_eq!(error(&assignments, false), "[line 1] Error at 'a': Too much nesting.");
}
