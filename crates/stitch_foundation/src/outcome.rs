//! The normalized result of one execution request.

use std::fmt;

use crate::diagnostic::Diagnostics;
use crate::error::Error;
use crate::value::Value;

/// What happened when a chunk of code was submitted.
///
/// Exactly one payload is ever present.
#[derive(Clone, Debug)]
pub enum ExecutionOutcome {
    /// The code ran. `None` means the chunk produced no value.
    Success(Option<Value>),
    /// The code did not compile.
    CompilationError(Diagnostics),
    /// The code compiled but failed while running.
    ExecutionError(Error),
    /// There was no code to run.
    Empty,
}

impl ExecutionOutcome {
    /// Returns true for [`ExecutionOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for [`ExecutionOutcome::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the return value of a successful run.
    #[must_use]
    pub const fn return_value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => value.as_ref(),
            _ => None,
        }
    }

    /// Returns the diagnostics of a compilation failure.
    #[must_use]
    pub const fn compilation_error(&self) -> Option<&Diagnostics> {
        match self {
            Self::CompilationError(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }

    /// Returns the error of an execution failure.
    #[must_use]
    pub const fn execution_error(&self) -> Option<&Error> {
        match self {
            Self::ExecutionError(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(Some(value)) => write!(f, "{}", value.repr()),
            Self::Success(None) | Self::Empty => Ok(()),
            Self::CompilationError(diagnostics) => write!(f, "{diagnostics}"),
            Self::ExecutionError(error) => write!(f, "{error}"),
        }
    }
}
