use std::rc::Rc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::Redeclaration;
use crate::expr::Expr;
use crate::statement::Stmt;

#[derive(Default)]
struct ResolverScope {
    // Whether the binding has been read or assigned since its declaration.
    vars: FxHashMap<Rc<str>, bool>,
}

impl ResolverScope {
    fn new() -> Self {
        Default::default()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolverErr {
    #[error("[line {line}] Error at '{name}': Variable '{name}' redeclared in the same scope before use.")]
    Redeclaration { name: Rc<str>, line: usize },
}

/// Static pass over a parsed program that applies the redeclaration policy.
pub struct Resolver {
    stack: Vec<ResolverScope>,
    policy: Redeclaration,
    errors: Vec<ResolverErr>,
}

impl Resolver {
    pub fn new(policy: Redeclaration) -> Self {
        // Just the global scope is present.
        Self {
            stack: vec![ResolverScope::new()],
            policy,
            errors: vec![],
        }
    }

    pub fn resolve(mut self, program: &[Stmt]) -> Result<(), Vec<ResolverErr>> {
        for stmt in program {
            self.resolve_stmt(stmt);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Block(stmts) => {
                self.stack.push(ResolverScope::new());
                for inner in stmts.iter() {
                    self.resolve_stmt(inner);
                }
                self.stack.pop();
            }
            Stmt::Declare(id, val, line) => {
                // `var a = a + 1;` reads the earlier `a` before redeclaring it.
                if let Some(val) = val {
                    self.resolve_expr(val);
                }
                self.declare(id, *line);
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) | Expr::Number(..) => {}
            Expr::Grouping(inner) | Expr::Unary(_, inner, _) => self.resolve_expr(inner),
            Expr::Binary(_, l, r, _) => {
                self.resolve_expr(l);
                self.resolve_expr(r);
            }
            Expr::Variable(id, _) => self.mark_used(id),
            Expr::Assignment(id, val, _) => {
                self.resolve_expr(val);
                self.mark_used(id);
            }
        }
    }

    fn mark_used(&mut self, id: &str) {
        if let Some(used) = self
            .stack
            .iter_mut()
            .rev()
            .find_map(|scope| scope.vars.get_mut(id))
        {
            *used = true;
        }
    }

    fn declare(&mut self, id: &Rc<str>, line: usize) {
        let Some(scope) = self.stack.last_mut() else {
            return;
        };

        if scope.vars.get(id) == Some(&false) {
            match self.policy {
                Redeclaration::Allow => {}
                Redeclaration::Warn => {
                    tracing::warn!(line, name = %id, "variable redeclared in the same scope before use");
                }
                Redeclaration::Deny => self.errors.push(ResolverErr::Redeclaration {
                    name: id.clone(),
                    line,
                }),
            }
        }

        scope.vars.insert(id.clone(), false);
    }
}
