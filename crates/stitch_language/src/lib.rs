//! The Stitch script language.
//!
//! This crate provides:
//! - [`Lexer`] and [`parse`] - Source text to [`Program`]
//! - [`binder::check`] - Compile-time name resolution
//! - [`Interpreter`] - Runs a program against a persistent [`Scope`]
//! - [`Linker`] - Resolves calls to referenced [`NativeModule`](stitch_foundation::NativeModule)s
//! - [`modules`] - The built-in `Core` and `Math` modules

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod binder;
pub mod interpreter;
pub mod lexer;
pub mod linker;
pub mod modules;
pub mod parser;
pub mod scope;
pub mod span;
pub mod token;

pub use ast::{AssignOp, BinaryOp, Expr, Program, Stmt, UnaryOp};
pub use interpreter::{Execution, Interpreter, execute};
pub use lexer::Lexer;
pub use linker::Linker;
pub use modules::{CORE_MODULE, MATH_MODULE, core_module, math_module};
pub use parser::parse;
pub use scope::{Binding, Scope};
pub use span::Span;
pub use token::{Token, TokenKind, TypeKeyword};
