//! Incremental execution of code chunks within a session.
//!
//! The [`SessionCoordinator`] runs successive chunks of code as if they were
//! one growing program. The first call of a session registers everything it
//! is given and runs on a fresh host. Later calls register only the
//! references and namespaces the session has not seen yet, then continue
//! from the handle of the last successful run.
//!
//! Every engine failure is turned into an [`ExecutionOutcome`]; the only
//! error [`execute`](SessionCoordinator::execute) returns is misuse of a
//! terminated pack session.

use stitch_foundation::{
    Error, ErrorKind, ExecutionOutcome, NamespaceSet, Reference, ReferenceSet, Result,
};

use crate::configuration::EngineConfiguration;
use crate::engine::{Continuation, ExecutionEngine, Globals};
use crate::host::{DefaultHostFactory, ScriptHost, ScriptHostFactory};
use crate::options::SessionOptions;
use crate::pack::ScriptPackSession;
use crate::record::SessionRecord;

/// One chunk of code plus the inputs declared alongside it.
#[derive(Clone, Debug, Default)]
pub struct ExecutionRequest {
    /// Source code to run.
    pub code: String,

    /// Script arguments handed to the host.
    pub args: Vec<String>,

    /// References declared for this call.
    pub references: ReferenceSet,

    /// Namespaces imported for this call.
    pub namespaces: NamespaceSet,
}

impl ExecutionRequest {
    /// Creates a request for `code` with no extra inputs.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the script arguments.
    #[must_use]
    pub fn with_args<S: Into<String>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to add a reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<Reference>) -> Self {
        self.references = self.references.with(reference);
        self
    }

    /// Builder method to add several references.
    #[must_use]
    pub fn with_references(mut self, references: &ReferenceSet) -> Self {
        self.references = self.references.union(references);
        self
    }

    /// Builder method to import a namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces = self.namespaces.with(namespace);
        self
    }

    /// Builder method to import several namespaces.
    #[must_use]
    pub fn with_namespaces(mut self, namespaces: &NamespaceSet) -> Self {
        self.namespaces = self.namespaces.union(namespaces);
        self
    }
}

/// Drives an [`ExecutionEngine`] across the calls of a session.
///
/// The coordinator holds no per-session state: everything lives in the
/// [`ScriptPackSession`] passed to [`execute`](Self::execute), so one
/// coordinator can serve many sessions from many threads.
pub struct SessionCoordinator<E, F = DefaultHostFactory> {
    engine: E,
    factory: F,
    options: SessionOptions,
}

impl<E: ExecutionEngine> SessionCoordinator<E> {
    /// Creates a coordinator with the default host factory.
    #[must_use]
    pub fn new(engine: E, options: SessionOptions) -> Self {
        Self::with_factory(engine, DefaultHostFactory, options)
    }
}

impl<E: ExecutionEngine, F: ScriptHostFactory> SessionCoordinator<E, F> {
    /// Creates a coordinator with a custom host factory.
    #[must_use]
    pub const fn with_factory(engine: E, factory: F, options: SessionOptions) -> Self {
        Self {
            engine,
            factory,
            options,
        }
    }

    /// Returns the engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns the defaults new sessions start from.
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Returns the session's record, if it has run anything yet.
    #[must_use]
    pub fn record<'s>(&self, pack: &'s ScriptPackSession) -> Option<&'s SessionRecord<E::Handle>> {
        pack.state().get::<SessionRecord<E::Handle>>()
    }

    /// Runs one chunk in the session held by `pack`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`] if `pack` has been terminated.
    /// Compilation and runtime failures are reported through the outcome.
    pub fn execute(
        &self,
        request: ExecutionRequest,
        pack: &mut ScriptPackSession,
    ) -> Result<ExecutionOutcome> {
        if pack.is_terminated() {
            return Err(Error::invalid_argument(
                "cannot execute in a terminated script pack session",
            ));
        }

        let execution_references = request.references.union(pack.references());
        let host = self.factory.create_host(pack.contexts(), &request.args);

        if pack.state().contains::<SessionRecord<E::Handle>>() {
            Ok(self.continue_session(request, execution_references, &host, pack))
        } else {
            Ok(self.start_session(request, execution_references, &host, pack))
        }
    }

    fn start_session(
        &self,
        request: ExecutionRequest,
        execution_references: ReferenceSet,
        host: &ScriptHost,
        pack: &mut ScriptPackSession,
    ) -> ExecutionOutcome {
        let all_namespaces = request.namespaces.union(pack.namespaces());
        let registered = execution_references.with_module(host.module().clone());
        tracing::debug!(
            references = registered.len(),
            namespaces = all_namespaces.len(),
            "starting session"
        );

        let base = self.options.engine_configuration();
        let configuration = match self.register(
            &base,
            Globals::Host(host),
            &registered,
            &all_namespaces,
        ) {
            Ok(configuration) => configuration,
            Err(outcome) => return outcome,
        };

        let mut record =
            SessionRecord::new(execution_references, all_namespaces, configuration);
        let (outcome, handle) =
            self.run_once(&request.code, Globals::Host(host), &record.configuration);
        if handle.is_some() {
            record.continuation = handle;
        }
        pack.state_mut().insert(record);
        outcome
    }

    fn continue_session(
        &self,
        request: ExecutionRequest,
        execution_references: ReferenceSet,
        host: &ScriptHost,
        pack: &mut ScriptPackSession,
    ) -> ExecutionOutcome {
        let Some(record) = pack.state_mut().get_mut::<SessionRecord<E::Handle>>() else {
            return ExecutionOutcome::ExecutionError(Error::internal("session record missing"));
        };

        let new_references = execution_references.except(&record.baseline_references);
        let new_namespaces = request.namespaces.except(&record.baseline_namespaces);
        if !new_references.is_empty() || !new_namespaces.is_empty() {
            match self.register(
                &record.configuration,
                record.globals(host),
                &new_references,
                &new_namespaces,
            ) {
                Ok(configuration) => record.configuration = configuration,
                Err(outcome) => return outcome,
            }
            record.baseline_references = record.baseline_references.union(&new_references);
            record.baseline_namespaces = record.baseline_namespaces.union(&new_namespaces);
        }

        tracing::debug!(
            new_references = new_references.len(),
            new_namespaces = new_namespaces.len(),
            version = record.configuration.version(),
            "continuing session"
        );

        if request.code.trim().is_empty() {
            tracing::trace!("skipping empty chunk");
            return ExecutionOutcome::Empty;
        }

        let (outcome, handle) =
            self.run_once(&request.code, record.globals(host), &record.configuration);
        if handle.is_some() {
            record.continuation = handle;
        }
        outcome
    }

    /// Validates one batch of new references and namespaces together and
    /// returns the configuration with the batch applied. A rejected batch
    /// applies nothing.
    fn register(
        &self,
        configuration: &EngineConfiguration,
        globals: Globals<'_, E::Handle>,
        references: &ReferenceSet,
        namespaces: &NamespaceSet,
    ) -> std::result::Result<EngineConfiguration, ExecutionOutcome> {
        if let Err(error) = self
            .engine
            .validate(configuration, globals, references, namespaces)
        {
            tracing::warn!(
                references = references.len(),
                namespaces = namespaces.len(),
                "registration rejected"
            );
            return Err(outcome_from_error(error));
        }

        let updated = configuration
            .with_references(references)
            .with_namespaces(namespaces);
        if updated.version() != configuration.version() {
            tracing::trace!(
                from = configuration.version(),
                to = updated.version(),
                "engine configuration updated"
            );
        }
        Ok(updated)
    }

    /// Runs `code` once and normalizes the result.
    ///
    /// On success the new handle is returned alongside the outcome; on
    /// failure the handle is `None` and the caller keeps its previous one.
    pub fn run_once(
        &self,
        code: &str,
        globals: Globals<'_, E::Handle>,
        configuration: &EngineConfiguration,
    ) -> (ExecutionOutcome, Option<E::Handle>) {
        match self.engine.run(code, globals, configuration) {
            Ok(handle) => {
                let value = handle.return_value().cloned();
                (ExecutionOutcome::Success(value), Some(handle))
            }
            Err(error) => {
                let outcome = outcome_from_error(error);
                tracing::debug!(outcome = %outcome, "run failed");
                (outcome, None)
            }
        }
    }
}

/// Normalizes an engine error into an outcome.
///
/// An aggregate wrapping exactly one error is unwrapped one level; the inner
/// error inherits the aggregate's context if it has none of its own.
#[must_use]
pub fn outcome_from_error(error: Error) -> ExecutionOutcome {
    match error.kind {
        ErrorKind::Aggregate(mut inner) if inner.len() == 1 => {
            let mut cause = inner.remove(0);
            if cause.context.is_none() {
                cause.context = error.context;
            }
            ExecutionOutcome::ExecutionError(cause)
        }
        ErrorKind::Compilation(diagnostics) => ExecutionOutcome::CompilationError(diagnostics),
        kind => ExecutionOutcome::ExecutionError(Error {
            kind,
            context: error.context,
        }),
    }
}

impl<E, F> std::fmt::Debug for SessionCoordinator<E, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
