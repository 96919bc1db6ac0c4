//! Running script files.

use std::path::Path;

use stitch_foundation::{Error, ErrorContext, ExecutionOutcome, Result};
use stitch_session::{ExecutionRequest, ScriptEngine, ScriptPackSession, SessionCoordinator};

use crate::directive::split_directives;

/// Runs whole script files as single chunks.
///
/// Leading `#r` and `using` directives become the chunk's references and
/// imports; the rest of the file is the code.
#[derive(Debug)]
pub struct ScriptRunner<'a> {
    coordinator: &'a SessionCoordinator<ScriptEngine>,
    args: Vec<String>,
}

impl<'a> ScriptRunner<'a> {
    /// Creates a runner on top of a coordinator.
    #[must_use]
    pub const fn new(coordinator: &'a SessionCoordinator<ScriptEngine>) -> Self {
        Self {
            coordinator,
            args: Vec::new(),
        }
    }

    /// Sets the script arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Builds the request for a script's source.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed directive.
    pub fn request(&self, source: &str) -> Result<ExecutionRequest> {
        let (directives, code) = split_directives(source)?;
        let request = directives
            .iter()
            .fold(ExecutionRequest::new(code), |request, directive| {
                directive.apply(request)
            });
        Ok(request.with_args(self.args.iter().cloned()))
    }

    /// Runs script source in `session`.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed directive or a terminated session.
    pub fn run_source(
        &self,
        source: &str,
        session: &mut ScriptPackSession,
    ) -> Result<ExecutionOutcome> {
        let request = self.request(source)?;
        self.coordinator.execute(request, session)
    }

    /// Reads and runs a script file in `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a directive is malformed,
    /// or the session has been terminated.
    pub fn run_file(
        &self,
        path: &Path,
        session: &mut ScriptPackSession,
    ) -> Result<ExecutionOutcome> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            Error::from(e).with_context(ErrorContext::new().with_source(path.display().to_string()))
        })?;
        tracing::debug!(script = %path.display(), args = self.args.len(), "running script");
        self.run_source(&source, session)
    }
}
