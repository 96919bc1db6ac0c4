//! REPL, CLI, and script runner for Stitch.
//!
//! This crate provides:
//! - [`Repl`] - Interactive read-eval-print loop over one session
//! - [`ScriptRunner`] - Runs script files as single chunks
//! - [`directive`] - `#r` and `using` directive parsing
//! - [`logging`] - stderr logging setup for binaries

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod directive;
pub mod editor;
pub mod logging;
pub mod repl;
pub mod runner;

pub use directive::{Directive, parse_directive, split_directives};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::{Flow, Repl, print_outcome};
pub use runner::ScriptRunner;
