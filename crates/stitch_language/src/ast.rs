//! Abstract syntax tree for the Stitch script language.

use crate::span::Span;
use crate::token::TypeKeyword;

/// A parsed chunk of source: a sequence of statements.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Returns true if the final statement is an unterminated expression,
    /// which makes its value the chunk's return value.
    #[must_use]
    pub fn has_return_value(&self) -> bool {
        matches!(
            self.statements.last(),
            Some(Stmt::Expr {
                terminated: false,
                ..
            })
        )
    }
}

/// A statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `int x = 1;`
    Declare {
        /// Declared type.
        ty: TypeKeyword,
        /// Variable name.
        name: String,
        /// Initializer.
        init: Expr,
        /// Source span.
        span: Span,
    },
    /// `x = 1;`, `x += 1;`
    Assign {
        /// Target variable.
        name: String,
        /// Plain or compound assignment.
        op: AssignOp,
        /// Assigned expression.
        value: Expr,
        /// Source span.
        span: Span,
    },
    /// An expression evaluated for its value or side effects.
    Expr {
        /// The expression.
        expr: Expr,
        /// Whether a `;` followed it.
        terminated: bool,
        /// Source span.
        span: Span,
    },
    /// `if (cond) { ... } else { ... }`
    If {
        /// Condition.
        cond: Expr,
        /// Statements run when the condition holds.
        then_branch: Vec<Stmt>,
        /// Statements run otherwise.
        else_branch: Option<Vec<Stmt>>,
        /// Source span.
        span: Span,
    },
    /// `while (cond) { ... }`
    While {
        /// Condition.
        cond: Expr,
        /// Loop body.
        body: Vec<Stmt>,
        /// Source span.
        span: Span,
    },
    /// `throw expr;`
    Throw {
        /// The thrown value.
        value: Expr,
        /// Source span.
        span: Span,
    },
}

impl Stmt {
    /// Returns the source span of this statement.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Declare { span, .. }
            | Self::Assign { span, .. }
            | Self::Expr { span, .. }
            | Self::If { span, .. }
            | Self::While { span, .. }
            | Self::Throw { span, .. } => *span,
        }
    }
}

/// Plain or compound assignment operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Set,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
}

impl AssignOp {
    /// Returns the binary operator a compound assignment applies.
    #[must_use]
    pub const fn binary(self) -> Option<BinaryOp> {
        match self {
            Self::Set => None,
            Self::Add => Some(BinaryOp::Add),
            Self::Sub => Some(BinaryOp::Sub),
            Self::Mul => Some(BinaryOp::Mul),
            Self::Div => Some(BinaryOp::Div),
        }
    }
}

/// An expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `null`
    Null(Span),
    /// `true` or `false`
    Bool(bool, Span),
    /// Integer literal
    Int(i64, Span),
    /// Float literal
    Float(f64, Span),
    /// String literal
    String(String, Span),
    /// List literal `[a, b]`
    List(Vec<Expr>, Span),
    /// Variable reference
    Variable(String, Span),
    /// Prefix operator
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
        /// Source span.
        span: Span,
    },
    /// Infix operator
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
        /// Source span.
        span: Span,
    },
    /// `target[index]`
    Index {
        /// Indexed expression.
        target: Box<Expr>,
        /// Index expression.
        index: Box<Expr>,
        /// Source span.
        span: Span,
    },
    /// `F(args)` or `Ns.F(args)`
    Call {
        /// Namespace segments, empty for a bare call.
        namespace: Vec<String>,
        /// Function name.
        function: String,
        /// Arguments.
        args: Vec<Expr>,
        /// Source span.
        span: Span,
    },
}

impl Expr {
    /// Returns the source span of this expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Null(s)
            | Self::Bool(_, s)
            | Self::Int(_, s)
            | Self::Float(_, s)
            | Self::String(_, s)
            | Self::List(_, s)
            | Self::Variable(_, s) => *s,
            Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Index { span, .. }
            | Self::Call { span, .. } => *span,
        }
    }
}

/// Prefix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

/// Infix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// Returns the operator's source text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}
