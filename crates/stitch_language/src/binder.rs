//! Compile-time name checking.
//!
//! The binder walks a parsed [`Program`] before it runs and reports every
//! variable, namespace, or function that cannot be resolved. All statements
//! of a chunk share one scope; blocks do not introduce their own.

use std::collections::HashSet;

use stitch_foundation::{Diagnostics, Error, ErrorKind, Result};

use crate::ast::{Expr, Program, Stmt};
use crate::linker::Linker;
use crate::scope::Scope;
use crate::span::Span;

/// Checks every name in `program` against `scope` and `linker`.
///
/// # Errors
///
/// Returns a compilation error listing every unresolved name.
pub fn check(program: &Program, scope: &Scope, linker: &Linker) -> Result<()> {
    let mut binder = Binder {
        scope,
        linker,
        declared: HashSet::new(),
        diagnostics: Diagnostics::new(),
    };
    binder.check_block(&program.statements);

    if binder.diagnostics.is_empty() {
        Ok(())
    } else {
        Err(Error::compilation(binder.diagnostics))
    }
}

struct Binder<'a> {
    scope: &'a Scope,
    linker: &'a Linker,
    declared: HashSet<String>,
    diagnostics: Diagnostics,
}

impl Binder<'_> {
    fn check_block(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.check_statement(statement);
        }
    }

    fn check_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Declare { name, init, .. } => {
                self.check_expr(init);
                self.declared.insert(name.clone());
            }
            Stmt::Assign {
                name, value, span, ..
            } => {
                self.check_expr(value);
                self.check_variable(name, *span);
            }
            Stmt::Expr { expr, .. } => self.check_expr(expr),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.check_expr(cond);
                self.check_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_block(else_branch);
                }
            }
            Stmt::While { cond, body, .. } => {
                self.check_expr(cond);
                self.check_block(body);
            }
            Stmt::Throw { value, .. } => self.check_expr(value),
        }
    }

    fn check_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Null(_) | Expr::Bool(..) | Expr::Int(..) | Expr::Float(..) | Expr::String(..) => {
            }
            Expr::List(items, _) => {
                for item in items {
                    self.check_expr(item);
                }
            }
            Expr::Variable(name, span) => self.check_variable(name, *span),
            Expr::Unary { operand, .. } => self.check_expr(operand),
            Expr::Binary { left, right, .. } => {
                self.check_expr(left);
                self.check_expr(right);
            }
            Expr::Index { target, index, .. } => {
                self.check_expr(target);
                self.check_expr(index);
            }
            Expr::Call {
                namespace,
                function,
                args,
                span,
            } => {
                if let Err(error) = self.linker.resolve(namespace, function) {
                    let message = match &error.kind {
                        ErrorKind::NamespaceNotFound(ns) => format!(
                            "the namespace `{ns}` does not exist (are you missing a reference?)"
                        ),
                        ErrorKind::UndefinedFunction(name) if namespace.is_empty() => format!(
                            "the name `{name}` does not exist in the current context (are you missing a namespace import?)"
                        ),
                        _ => error.to_string(),
                    };
                    self.diagnostics.push(span.error(message));
                }
                for arg in args {
                    self.check_expr(arg);
                }
            }
        }
    }

    fn check_variable(&mut self, name: &str, span: Span) {
        if !self.scope.contains(name) && !self.declared.contains(name) {
            self.diagnostics.push(span.error(format!(
                "the name `{name}` does not exist in the current context"
            )));
        }
    }
}
