//! Tree-walking interpreter.
//!
//! The interpreter runs a checked [`Program`] against an owned [`Scope`] and
//! hands the evolved scope back. Callers keep their previous scope, so a run
//! that fails halfway leaves no trace.

use stitch_foundation::{Error, ErrorContext, ErrorKind, Result, Value};

use crate::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::binder;
use crate::linker::Linker;
use crate::parser::parse;
use crate::scope::Scope;
use crate::span::Span;

/// The result of running one chunk.
#[derive(Clone, Debug)]
pub struct Execution {
    /// Scope after the chunk ran.
    pub scope: Scope,
    /// Value of the chunk's final unterminated expression, if not null.
    pub return_value: Option<Value>,
}

/// Parses, checks, and runs `source`.
///
/// # Errors
///
/// Returns a compilation error if the source does not parse or bind, and a
/// runtime error if it fails while running.
pub fn execute(source: &str, scope: Scope, linker: &Linker) -> Result<Execution> {
    let program = parse(source)?;
    binder::check(&program, &scope, linker)?;
    Interpreter::new(linker).run(&program, scope)
}

/// Runs programs against a linker.
pub struct Interpreter<'a> {
    linker: &'a Linker,
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter calling functions through `linker`.
    #[must_use]
    pub const fn new(linker: &'a Linker) -> Self {
        Self { linker }
    }

    /// Runs a program.
    ///
    /// # Errors
    ///
    /// Returns the first runtime error raised.
    pub fn run(&self, program: &Program, mut scope: Scope) -> Result<Execution> {
        let mut return_value = None;
        let last = program.statements.len().saturating_sub(1);

        for (i, statement) in program.statements.iter().enumerate() {
            match statement {
                Stmt::Expr {
                    expr,
                    terminated: false,
                    ..
                } if i == last => {
                    let value = self.eval(expr, &scope)?;
                    if !value.is_null() {
                        return_value = Some(value);
                    }
                }
                other => self.exec(other, &mut scope)?,
            }
        }

        Ok(Execution {
            scope,
            return_value,
        })
    }

    fn exec_block(&self, statements: &[Stmt], scope: &mut Scope) -> Result<()> {
        for statement in statements {
            self.exec(statement, scope)?;
        }
        Ok(())
    }

    fn exec(&self, statement: &Stmt, scope: &mut Scope) -> Result<()> {
        match statement {
            Stmt::Declare {
                ty,
                name,
                init,
                span,
            } => {
                let value = self.eval(init, scope)?;
                scope
                    .declare(name.clone(), *ty, value)
                    .map_err(|e| at(e, *span))
            }
            Stmt::Assign {
                name,
                op,
                value,
                span,
            } => {
                let value = self.eval(value, scope)?;
                let value = match op.binary() {
                    Some(op) => {
                        let current = scope
                            .value(name)
                            .cloned()
                            .ok_or_else(|| at(Error::undefined_symbol(name.clone()), *span))?;
                        binary(op, &current, &value).map_err(|e| at(e, *span))?
                    }
                    None => value,
                };
                scope.assign(name, value).map_err(|e| at(e, *span))
            }
            Stmt::Expr { expr, .. } => self.eval(expr, scope).map(drop),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                if self.condition(cond, scope)? {
                    self.exec_block(then_branch, scope)
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(else_branch, scope)
                } else {
                    Ok(())
                }
            }
            Stmt::While { cond, body, .. } => {
                while self.condition(cond, scope)? {
                    self.exec_block(body, scope)?;
                }
                Ok(())
            }
            Stmt::Throw { value, span } => {
                let value = self.eval(value, scope)?;
                Err(at(Error::thrown(value.to_string()), *span))
            }
        }
    }

    fn condition(&self, cond: &Expr, scope: &Scope) -> Result<bool> {
        let value = self.eval(cond, scope)?;
        value
            .as_bool()
            .ok_or_else(|| at(Error::type_mismatch("bool", value.type_name()), cond.span()))
    }

    /// Evaluates an expression.
    ///
    /// # Errors
    ///
    /// Returns a runtime error if evaluation fails.
    pub fn eval(&self, expr: &Expr, scope: &Scope) -> Result<Value> {
        match expr {
            Expr::Null(_) => Ok(Value::Null),
            Expr::Bool(b, _) => Ok(Value::Bool(*b)),
            Expr::Int(n, _) => Ok(Value::Int(*n)),
            Expr::Float(n, _) => Ok(Value::Float(*n)),
            Expr::String(s, _) => Ok(Value::string(s)),
            Expr::List(items, _) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::list(values))
            }
            Expr::Variable(name, span) => scope
                .value(name)
                .cloned()
                .ok_or_else(|| at(Error::undefined_symbol(name.clone()), *span)),
            Expr::Unary { op, operand, span } => {
                let value = self.eval(operand, scope)?;
                unary(*op, &value).map_err(|e| at(e, *span))
            }
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
                ..
            } => Ok(Value::Bool(
                self.condition(left, scope)? && self.condition(right, scope)?,
            )),
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
                ..
            } => Ok(Value::Bool(
                self.condition(left, scope)? || self.condition(right, scope)?,
            )),
            Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                binary(*op, &left, &right).map_err(|e| at(e, *span))
            }
            Expr::Index {
                target,
                index,
                span,
            } => {
                let target = self.eval(target, scope)?;
                let index = self.eval(index, scope)?;
                self::index(&target, &index).map_err(|e| at(e, *span))
            }
            Expr::Call {
                namespace,
                function,
                args,
                span,
            } => {
                let module = self
                    .linker
                    .resolve(namespace, function)
                    .map_err(|e| at(e, *span))?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, scope))
                    .collect::<Result<Vec<_>>>()?;
                module.module().call(function, &args).map_err(|inner| {
                    Error::aggregate(vec![inner]).with_context(
                        ErrorContext::new()
                            .with_position(span.line, span.column)
                            .with_frame(format!("{}.{function}", module.namespace())),
                    )
                })
            }
        }
    }
}

/// Attaches a source position to an error that has none yet.
fn at(error: Error, span: Span) -> Error {
    if error.context.is_some() {
        return error;
    }
    error.with_context(ErrorContext::new().with_position(span.line, span.column))
}

fn unary(op: UnaryOp, value: &Value) -> Result<Value> {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| Error::new(ErrorKind::Overflow)),
        (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, other) => Err(Error::type_mismatch("number", other.type_name())),
        (UnaryOp::Not, other) => Err(Error::type_mismatch("bool", other.type_name())),
    }
}

/// Applies an arithmetic or comparison operator.
///
/// Integer arithmetic is checked; string `+` concatenates with any value.
fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    use BinaryOp::{Add, And, Div, Eq, Ge, Gt, Le, Lt, Mul, Ne, Or, Rem, Sub};

    match (op, left, right) {
        (Eq, l, r) => Ok(Value::Bool(values_equal(l, r))),
        (Ne, l, r) => Ok(Value::Bool(!values_equal(l, r))),
        (Add, Value::String(l), r) => Ok(Value::string(format!("{l}{r}"))),
        (Add, l, Value::String(r)) => Ok(Value::string(format!("{l}{r}"))),
        (Add, Value::List(l), Value::List(r)) => {
            let mut joined = l.clone();
            joined.append(r.clone());
            Ok(Value::List(joined))
        }
        (Add | Sub | Mul | Div | Rem, Value::Int(l), Value::Int(r)) => int_arith(op, *l, *r),
        (Add | Sub | Mul | Div | Rem, l, r) => match (l.as_number(), r.as_number()) {
            (Some(l), Some(r)) => Ok(Value::Float(match op {
                Add => l + r,
                Sub => l - r,
                Mul => l * r,
                Div => l / r,
                _ => l % r,
            })),
            _ => Err(mismatch(op, l, r)),
        },
        (Lt | Le | Gt | Ge, l, r) => {
            let ordering = match (l, r) {
                (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => match (l.as_number(), r.as_number()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => return Err(mismatch(op, l, r)),
                },
            };
            Ok(Value::Bool(ordering.is_some_and(|o| match op {
                Lt => o.is_lt(),
                Le => o.is_le(),
                Gt => o.is_gt(),
                _ => o.is_ge(),
            })))
        }
        (And | Or, l, r) => match (l, r) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(mismatch(op, l, r)),
        },
    }
}

fn int_arith(op: BinaryOp, l: i64, r: i64) -> Result<Value> {
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && r == 0 {
        return Err(Error::new(ErrorKind::DivisionByZero));
    }
    let result = match op {
        BinaryOp::Add => l.checked_add(r),
        BinaryOp::Sub => l.checked_sub(r),
        BinaryOp::Mul => l.checked_mul(r),
        BinaryOp::Div => l.checked_div(r),
        _ => l.checked_rem(r),
    };
    result
        .map(Value::Int)
        .ok_or_else(|| Error::new(ErrorKind::Overflow))
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
            left.as_number() == right.as_number()
        }
        _ => left == right,
    }
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> Error {
    Error::type_mismatch(
        format!("operands for '{}'", op.symbol()),
        format!("{} and {}", left.type_name(), right.type_name()),
    )
}

fn index(target: &Value, index: &Value) -> Result<Value> {
    let Value::Int(i) = index else {
        return Err(Error::type_mismatch("int index", index.type_name()));
    };
    let out_of_bounds = |length| Error::new(ErrorKind::IndexOutOfBounds { index: *i, length });
    match target {
        Value::List(items) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i).cloned())
            .ok_or_else(|| out_of_bounds(items.len())),
        Value::String(s) => usize::try_from(*i)
            .ok()
            .and_then(|i| s.chars().nth(i))
            .map(|c| Value::string(c.to_string()))
            .ok_or_else(|| out_of_bounds(s.chars().count())),
        other => Err(Error::type_mismatch("list or string", other.type_name())),
    }
}
