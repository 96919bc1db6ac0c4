//! Error types for the Stitch system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::diagnostic::Diagnostics;

/// Result type alias using the Stitch error.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Stitch operations.
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a compilation error carrying the given diagnostics.
    #[must_use]
    pub fn compilation(diagnostics: impl Into<Diagnostics>) -> Self {
        Self::new(ErrorKind::Compilation(diagnostics.into()))
    }

    /// Creates an aggregate error wrapping one or more inner failures.
    #[must_use]
    pub fn aggregate(inner: Vec<Error>) -> Self {
        Self::new(ErrorKind::Aggregate(inner))
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Creates an undefined symbol error.
    #[must_use]
    pub fn undefined_symbol(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedSymbol(name.into()))
    }

    /// Creates an undefined function error.
    #[must_use]
    pub fn undefined_function(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedFunction(name.into()))
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(function: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            function: function.into(),
            expected: expected.into(),
            actual,
        })
    }

    /// Creates an error for a value thrown by script code.
    #[must_use]
    pub fn thrown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Thrown(message.into()))
    }

    /// Creates an invalid argument (usage) error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns the diagnostics if this is a compilation error.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match &self.kind {
            ErrorKind::Compilation(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(error.to_string()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Clone, Debug, Error)]
pub enum ErrorKind {
    /// The source did not compile.
    #[error("compilation failed:\n{0}")]
    Compilation(Diagnostics),

    /// A wrapper around one or more failures raised underneath the engine.
    #[error("{}", format_aggregate(.0))]
    Aggregate(Vec<Error>),

    /// Type mismatch during runtime type checking.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: String,
        /// The actual type encountered.
        actual: String,
    },

    /// Variable was not defined.
    #[error("undefined variable: {0}")]
    UndefinedSymbol(String),

    /// Function was not found in any referenced module.
    #[error("undefined function: {0}")]
    UndefinedFunction(String),

    /// A bare call matched functions in more than one imported namespace.
    #[error("call to {function} is ambiguous between namespaces {}", .namespaces.join(", "))]
    AmbiguousCall {
        /// The function being called.
        function: String,
        /// Every imported namespace exporting the function.
        namespaces: Vec<String>,
    },

    /// Wrong number of arguments to a function.
    #[error("arity mismatch calling {function}: expected {expected}, got {actual}")]
    ArityMismatch {
        /// The function being called.
        function: String,
        /// Description of expected arity.
        expected: String,
        /// Actual number of arguments.
        actual: usize,
    },

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer overflow.
    #[error("integer overflow")]
    Overflow,

    /// Index out of bounds.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: i64,
        /// The actual length of the collection.
        length: usize,
    },

    /// Script code executed a `throw` statement.
    #[error("thrown: {0}")]
    Thrown(String),

    /// A path reference could not be resolved.
    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    /// No referenced module exports the namespace.
    #[error("namespace not found: {0}")]
    NamespaceNotFound(String),

    /// A caller passed an argument that cannot be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O failure.
    #[error("i/o error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

fn format_aggregate(inner: &[Error]) -> String {
    match inner {
        [] => "one or more errors occurred".to_string(),
        [single] => format!("one or more errors occurred: {single}"),
        many => {
            let parts: Vec<String> = many.iter().map(ToString::to_string).collect();
            format!("{} errors occurred: {}", many.len(), parts.join("; "))
        }
    }
}

/// Context about where an error occurred.
#[derive(Clone, Debug, Default)]
pub struct ErrorContext {
    /// Source file or chunk name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<u32>,
    /// Column number in source.
    pub column: Option<u32>,
    /// Stack of native calls active when the error was raised.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
        }
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, ":{line}:{col}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
