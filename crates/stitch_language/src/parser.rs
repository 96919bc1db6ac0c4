//! Parser for the Stitch script language.
//!
//! The parser converts a stream of tokens into a [`Program`]. It stops at
//! the first syntax error and reports it as a compilation error carrying a
//! positioned diagnostic.

use stitch_foundation::{Error, Result};

use crate::ast::{AssignOp, BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parses a complete chunk of source.
///
/// # Errors
///
/// Returns a compilation error if the source is not syntactically valid.
pub fn parse(source: &str) -> Result<Program> {
    Parser::new(source).parse_program()
}

/// Parser for Stitch source code.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Span of the most recently consumed token.
    previous: Span,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = next_significant(&mut lexer);
        Self {
            lexer,
            previous: current.span,
            current,
        }
    }

    /// Parses all statements in the source.
    ///
    /// # Errors
    ///
    /// Returns a compilation error if the source cannot be parsed.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut statements = Vec::new();
        while self.current.kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Stmt> {
        match &self.current.kind {
            TokenKind::Type(_) => self.parse_declaration(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Ident(_) if self.peek_is_assignment() => self.parse_assignment(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Parses `TYPE NAME = EXPR;`.
    fn parse_declaration(&mut self) -> Result<Stmt> {
        let start = self.current.span;
        let TokenKind::Type(ty) = self.current.kind else {
            return Err(self.error("expected type"));
        };
        self.advance();
        let name = self.expect_ident("expected variable name")?;
        if self.current.kind != TokenKind::Assign {
            return Err(self.error(&format!(
                "expected '=' after `{name}`: variables must be initialized"
            )));
        }
        self.advance();
        let init = self.parse_expression()?;
        self.expect_terminator()?;
        Ok(Stmt::Declare {
            ty,
            name,
            init,
            span: start.to(self.previous),
        })
    }

    /// Parses `NAME op= EXPR;`.
    fn parse_assignment(&mut self) -> Result<Stmt> {
        let start = self.current.span;
        let name = self.expect_ident("expected variable name")?;
        let op = match self.current.kind {
            TokenKind::Assign => AssignOp::Set,
            TokenKind::PlusAssign => AssignOp::Add,
            TokenKind::MinusAssign => AssignOp::Sub,
            TokenKind::StarAssign => AssignOp::Mul,
            TokenKind::SlashAssign => AssignOp::Div,
            _ => return Err(self.error("expected assignment operator")),
        };
        self.advance();
        let value = self.parse_expression()?;
        self.expect_terminator()?;
        Ok(Stmt::Assign {
            name,
            op,
            value,
            span: start.to(self.previous),
        })
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt> {
        let start = self.current.span;
        let expr = self.parse_expression()?;
        let terminated = self.expect_terminator()?;
        Ok(Stmt::Expr {
            expr,
            terminated,
            span: start.to(self.previous),
        })
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let start = self.current.span;
        self.advance();
        let cond = self.parse_condition()?;
        let then_branch = self.parse_body()?;
        let else_branch = if self.current.kind == TokenKind::Else {
            self.advance();
            if self.current.kind == TokenKind::If {
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_body()?)
            }
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
            span: start.to(self.previous),
        })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let start = self.current.span;
        self.advance();
        let cond = self.parse_condition()?;
        let body = self.parse_body()?;
        Ok(Stmt::While {
            cond,
            body,
            span: start.to(self.previous),
        })
    }

    fn parse_throw(&mut self) -> Result<Stmt> {
        let start = self.current.span;
        self.advance();
        let value = self.parse_expression()?;
        self.expect_terminator()?;
        Ok(Stmt::Throw {
            value,
            span: start.to(self.previous),
        })
    }

    /// Parses `( EXPR )` after `if` or `while`.
    fn parse_condition(&mut self) -> Result<Expr> {
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(cond)
    }

    /// Parses a braced block, or a single statement.
    fn parse_body(&mut self) -> Result<Vec<Stmt>> {
        if self.current.kind != TokenKind::LBrace {
            return Ok(vec![self.parse_statement()?]);
        }
        self.advance();
        let mut statements = Vec::new();
        while !matches!(self.current.kind, TokenKind::RBrace | TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(statements)
    }

    /// Consumes a `;`. A missing terminator is only allowed at end of input.
    ///
    /// Returns whether a `;` was present.
    fn expect_terminator(&mut self) -> Result<bool> {
        match self.current.kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(true)
            }
            TokenKind::Eof => Ok(false),
            _ => Err(self.error("expected ';'")),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.current.kind == TokenKind::OrOr {
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;
        while self.current.kind == TokenKind::AndAnd {
            self.advance();
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.current.kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::Ne,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(op, left, right);
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.current.span;
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            span: start.to(operand.span()),
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        while self.current.kind == TokenKind::LBracket {
            self.advance();
            let index = self.parse_expression()?;
            self.expect(&TokenKind::RBracket)?;
            expr = Expr::Index {
                span: expr.span().to(self.previous),
                target: Box::new(expr),
                index: Box::new(index),
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let span = self.current.span;
        let expr = match &self.current.kind {
            TokenKind::Null => Expr::Null(span),
            TokenKind::True => Expr::Bool(true, span),
            TokenKind::False => Expr::Bool(false, span),
            TokenKind::Int(n) => Expr::Int(*n, span),
            TokenKind::Float(n) => Expr::Float(*n, span),
            TokenKind::String(s) => Expr::String(s.clone(), span),
            TokenKind::Ident(_) => return self.parse_name(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => return self.parse_list(),
            TokenKind::Eof => return Err(self.error("expected expression")),
            TokenKind::Error(msg) => {
                let msg = msg.clone();
                return Err(self.error(&msg));
            }
            other => {
                let name = other.name();
                return Err(self.error(&format!("unexpected {name}, expected expression")));
            }
        };
        self.advance();
        Ok(expr)
    }

    /// Parses a variable, or a possibly qualified call like `Math.Max(1, 2)`.
    fn parse_name(&mut self) -> Result<Expr> {
        let start = self.current.span;
        let mut segments = vec![self.expect_ident("expected identifier")?];
        while self.current.kind == TokenKind::Dot {
            self.advance();
            segments.push(self.expect_ident("expected identifier after '.'")?);
        }

        if self.current.kind == TokenKind::LParen {
            self.advance();
            let args = self.parse_arguments(&TokenKind::RParen)?;
            let function = segments.pop().unwrap_or_default();
            return Ok(Expr::Call {
                namespace: segments,
                function,
                args,
                span: start.to(self.previous),
            });
        }

        if segments.len() > 1 {
            return Err(Error::compilation(start.error(format!(
                "member access is not supported: `{}`",
                segments.join(".")
            ))));
        }
        Ok(Expr::Variable(segments.remove(0), start))
    }

    fn parse_list(&mut self) -> Result<Expr> {
        let start = self.current.span;
        self.advance();
        let items = self.parse_arguments(&TokenKind::RBracket)?;
        Ok(Expr::List(items, start.to(self.previous)))
    }

    /// Parses comma-separated expressions up to and including `close`.
    fn parse_arguments(&mut self, close: &TokenKind) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.current.kind == *close {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.current.kind == TokenKind::Comma {
                self.advance();
            } else {
                self.expect(close)?;
                return Ok(args);
            }
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn advance(&mut self) {
        self.previous = self.current.span;
        self.current = next_significant(&mut self.lexer);
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.current.kind == *kind {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                kind.name(),
                self.current.kind.name()
            )))
        }
    }

    fn expect_ident(&mut self, message: &str) -> Result<String> {
        if let TokenKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(message))
        }
    }

    /// Returns true if the token after the current one is an assignment operator.
    fn peek_is_assignment(&self) -> bool {
        let mut lookahead = self.lexer.clone();
        matches!(
            next_significant(&mut lookahead).kind,
            TokenKind::Assign
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
        )
    }

    fn error(&self, message: &str) -> Error {
        Error::compilation(self.current.span.error(message))
    }
}

/// Returns the next token that is not trivia.
fn next_significant(lexer: &mut Lexer<'_>) -> Token {
    loop {
        let token = lexer.next_token();
        if !token.kind.is_trivia() {
            return token;
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        span: left.span().to(right.span()),
        left: Box::new(left),
        right: Box::new(right),
    }
}
