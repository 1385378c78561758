use crate::expr::{EvalErr, ExprRef, Val};
use crate::scope::{Scope, ScopeLink};
use std::{cell::RefCell, fmt, io::Write, rc::Rc};

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Print(ExprRef),
    Expr(ExprRef),
    Declare(Rc<str>, Option<ExprRef>, usize),
    Block(Vec<Stmt>),
}

impl Stmt {
    /// Runs the statement against `scope`, writing `print` output to `out`.
    ///
    /// Expression statements hand back their value so a host can echo it;
    /// everything else yields `None`.
    pub fn exec(&self, scope: &ScopeLink, out: &mut dyn Write) -> Result<Option<Val>, EvalErr> {
        match self {
            Self::Print(expr) => {
                let val = expr.eval(scope)?;
                writeln!(out, "{}", val)?;
            }
            Self::Expr(expr) => return expr.eval(scope).map(Some),
            Self::Declare(id, val, _) => {
                let val = match val {
                    Some(val) => val.eval(scope)?,
                    None => Val::Nil,
                };
                (*scope).borrow_mut().declare(id.clone(), val);
            }
            Self::Block(stmts) => {
                tracing::trace!(statements = stmts.len(), "entering block");
                let child = Rc::new(RefCell::new(Scope::new_child(scope.clone())));
                for stmt in stmts.iter() {
                    stmt.exec(&child, out)?;
                }
            }
        }
        Ok(None)
    }
}

/// S-expression form, as printed by the `parse` mode.
impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Print(expr) => write!(f, "(print {expr})"),
            Self::Expr(expr) => write!(f, "{expr}"),
            Self::Declare(id, Some(val), _) => write!(f, "(var {id} {val})"),
            Self::Declare(id, None, _) => write!(f, "(var {id})"),
            Self::Block(stmts) => {
                write!(f, "(block")?;
                for stmt in stmts {
                    write!(f, " {stmt}")?;
                }
                write!(f, ")")
            }
        }
    }
}
