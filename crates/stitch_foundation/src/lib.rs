//! Core values, errors, diagnostics, and reference sets for Stitch.
//!
//! This crate provides:
//! - [`Value`] - The value type produced and consumed by scripts
//! - [`Error`] - Rich error types with context
//! - [`Diagnostics`] - Compile-time problems reported by an engine
//! - [`ReferenceSet`] and [`NamespaceSet`] - Persistent sets of engine inputs
//! - [`ExecutionOutcome`] - The normalized result of running a chunk of code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diagnostic;
pub mod error;
pub mod namespace;
pub mod outcome;
pub mod reference;
pub mod value;

pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use namespace::NamespaceSet;
pub use outcome::ExecutionOutcome;
pub use reference::{ModuleRef, NativeModule, Reference, ReferenceSet};
pub use value::Value;
