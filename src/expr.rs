use std::{fmt, io, rc::Rc};

use thiserror::Error;

use crate::scope::ScopeLink;

#[derive(Debug, PartialEq, Clone)]
pub enum Val {
    String(Rc<str>),
    Num(f64),
    Bool(bool),
    Nil,
}

impl Val {
    /// Only `nil` and `false` are falsy.
    pub fn truthy(&self) -> bool {
        !matches!(self, Val::Nil | Val::Bool(false))
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Val::Num(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::String(x) => write!(f, "{}", x),
            Self::Num(x) => write!(f, "{}", x),
            Self::Bool(x) => write!(f, "{}", x),
            Self::Nil => write!(f, "nil"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }
}

pub type ExprRef = Box<Expr>;

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Literal(Val),
    /// A number literal with the canonical text it was written as.
    Number(f64, Rc<str>),
    Grouping(ExprRef),
    Unary(UnaryOp, ExprRef, usize),
    Binary(BinaryOp, ExprRef, ExprRef, usize),
    Variable(Rc<str>, usize),
    Assignment(Rc<str>, ExprRef, usize),
}

impl Expr {
    pub fn eval(&self, scope: &ScopeLink) -> Result<Val, EvalErr> {
        match self {
            Self::Literal(v) => Ok(v.clone()),
            Self::Number(x, _) => Ok(Val::Num(*x)),
            Self::Grouping(inner) => inner.eval(scope),
            Self::Unary(op, x, line) => {
                let v = x.eval(scope)?;
                match (op, v) {
                    (UnaryOp::Not, v) => Ok(Val::Bool(!v.truthy())),
                    (UnaryOp::Negate, Val::Num(a)) => Ok(Val::Num(-a)),
                    (UnaryOp::Negate, _) => Err(EvalErr::type_error(
                        "Operand must be a number.",
                        *line,
                    )),
                }
            }
            Self::Binary(op, x, y, line) => {
                let l = x.eval(scope)?;
                let r = y.eval(scope)?;
                binary(*op, l, r, *line)
            }
            Self::Variable(id, line) => {
                (*scope)
                    .borrow()
                    .get(id)
                    .ok_or_else(|| EvalErr::UndefinedVariable {
                        name: id.clone(),
                        line: *line,
                    })
            }
            Self::Assignment(id, val, line) => {
                let r = val.eval(scope)?;
                if (*scope).borrow_mut().assign(id, r.clone()) {
                    Ok(r)
                } else {
                    Err(EvalErr::UndefinedVariable {
                        name: id.clone(),
                        line: *line,
                    })
                }
            }
        }
    }
}

fn binary(op: BinaryOp, l: Val, r: Val, line: usize) -> Result<Val, EvalErr> {
    let nums = l.as_num().zip(r.as_num());
    match (op, nums) {
        (BinaryOp::Add, Some((a, b))) => Ok(Val::Num(a + b)),
        (BinaryOp::Sub, Some((a, b))) => Ok(Val::Num(a - b)),
        (BinaryOp::Mul, Some((a, b))) => Ok(Val::Num(a * b)),
        (BinaryOp::Div, Some((_, b))) if b == 0.0 => Err(EvalErr::DivisionByZero { line }),
        (BinaryOp::Div, Some((a, b))) => Ok(Val::Num(a / b)),

        (BinaryOp::Less, Some((a, b))) => Ok(Val::Bool(a < b)),
        (BinaryOp::LessEqual, Some((a, b))) => Ok(Val::Bool(a <= b)),
        (BinaryOp::Greater, Some((a, b))) => Ok(Val::Bool(a > b)),
        (BinaryOp::GreaterEqual, Some((a, b))) => Ok(Val::Bool(a >= b)),

        (BinaryOp::Equal, Some((a, b))) => Ok(Val::Bool(a == b)),
        (BinaryOp::NotEqual, Some((a, b))) => Ok(Val::Bool(a != b)),
        (BinaryOp::Equal, None) => Ok(Val::Bool(l == r)),
        (BinaryOp::NotEqual, None) => Ok(Val::Bool(l != r)),

        // No stringifying: only two strings concatenate.
        (BinaryOp::Add, None) => match (l, r) {
            (Val::String(a), Val::String(b)) => {
                let mut c = a.to_string();
                c.push_str(&b);
                Ok(Val::String(c.into()))
            }
            _ => Err(EvalErr::type_error(
                "Operands must be two numbers or two strings.",
                line,
            )),
        },

        (
            BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Less
            | BinaryOp::LessEqual
            | BinaryOp::Greater
            | BinaryOp::GreaterEqual,
            None,
        ) => Err(EvalErr::type_error("Operands must be numbers.", line)),
    }
}

/// S-expression form, as printed by the `parse` mode.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "{v}"),
            Self::Number(_, text) => write!(f, "{text}"),
            Self::Grouping(inner) => write!(f, "(group {inner})"),
            Self::Unary(op, x, _) => write!(f, "({} {x})", op.symbol()),
            Self::Binary(op, x, y, _) => write!(f, "({} {x} {y})", op.symbol()),
            Self::Variable(id, _) => write!(f, "{id}"),
            Self::Assignment(id, val, _) => write!(f, "(= {id} {val})"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvalErr {
    #[error("[line {line}] Error: {message}")]
    TypeError { message: &'static str, line: usize },
    #[error("[line {line}] Error: Undefined variable '{name}'.")]
    UndefinedVariable { name: Rc<str>, line: usize },
    #[error("[line {line}] Error: Division by zero.")]
    DivisionByZero { line: usize },
    #[error("Error: could not write output: {0}")]
    Io(#[from] io::Error),
}

impl EvalErr {
    fn type_error(message: &'static str, line: usize) -> Self {
        Self::TypeError { message, line }
    }
}
