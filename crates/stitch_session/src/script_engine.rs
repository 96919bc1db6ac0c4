//! [`ExecutionEngine`] for the Stitch language.

use std::path::{Path, PathBuf};

use stitch_foundation::{
    Diagnostic, Diagnostics, Error, ModuleRef, NamespaceSet, ReferenceSet, Result, Value,
};
use stitch_language::{Linker, Scope, TypeKeyword, execute};

use crate::configuration::EngineConfiguration;
use crate::engine::{Continuation, ExecutionEngine, Globals};

/// Continuation handle of the Stitch engine.
///
/// Every field is persistent, so cloning a state is cheap and a run always
/// works on its own copy.
#[derive(Clone, Debug, Default)]
pub struct ScriptState {
    scope: Scope,
    loaded_libraries: im::OrdSet<PathBuf>,
    host_module: Option<ModuleRef>,
    return_value: Option<Value>,
}

impl ScriptState {
    /// Returns the variables declared so far.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the library scripts already run in this session.
    pub fn loaded_libraries(&self) -> impl Iterator<Item = &PathBuf> {
        self.loaded_libraries.iter()
    }

    /// Returns the host module the session was bootstrapped with.
    #[must_use]
    pub const fn host_module(&self) -> Option<&ModuleRef> {
        self.host_module.as_ref()
    }
}

impl Continuation for ScriptState {
    fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }
}

/// Runs Stitch code.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptEngine;

impl ScriptEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The state a run starts from: a fresh scope binding `Args` for a
    /// host, or a copy of the previous state.
    fn initial_state(globals: Globals<'_, ScriptState>) -> Result<ScriptState> {
        match globals {
            Globals::Host(host) => {
                let mut scope = Scope::new();
                scope.declare("Args", TypeKeyword::Var, host.args_value())?;
                Ok(ScriptState {
                    scope,
                    host_module: Some(host.module().clone()),
                    ..ScriptState::default()
                })
            }
            Globals::Continuation(previous) => Ok(previous.clone()),
        }
    }

    /// The host module goes first, so a fresh host shadows the one the
    /// session registered on its first call.
    fn linker(state: &ScriptState, configuration: &EngineConfiguration) -> Linker {
        let mut linker = Linker::default();
        if let Some(host) = &state.host_module {
            linker.add_module(host.clone());
            linker.import(host.namespace());
        }
        for module in configuration.references().modules() {
            linker.add_module(module.clone());
        }
        for namespace in configuration.namespaces().iter() {
            linker.import(namespace);
        }
        linker
    }

    /// Runs every configured library not yet loaded into `state`.
    fn load_libraries(
        mut state: ScriptState,
        configuration: &EngineConfiguration,
        linker: &Linker,
    ) -> Result<ScriptState> {
        for path in configuration.references().paths() {
            if state.loaded_libraries.contains(path) {
                continue;
            }
            let resolved = configuration.resolve_path(path);
            let source = std::fs::read_to_string(&resolved).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::compilation(missing_library(path))
                } else {
                    Error::from(e)
                }
            })?;
            tracing::trace!(library = %resolved.display(), "loading library script");
            let execution =
                execute(&source, state.scope, linker).map_err(|e| in_library(e, path))?;
            state.scope = execution.scope;
            state.loaded_libraries.insert(path.clone());
        }
        Ok(state)
    }
}

impl ExecutionEngine for ScriptEngine {
    type Handle = ScriptState;

    fn run(
        &self,
        code: &str,
        globals: Globals<'_, ScriptState>,
        configuration: &EngineConfiguration,
    ) -> Result<ScriptState> {
        let state = Self::initial_state(globals)?;
        let linker = Self::linker(&state, configuration);
        let mut state = Self::load_libraries(state, configuration, &linker)?;
        let execution = execute(code, state.scope, &linker)?;
        state.scope = execution.scope;
        state.return_value = execution.return_value;
        Ok(state)
    }

    fn validate(
        &self,
        configuration: &EngineConfiguration,
        globals: Globals<'_, ScriptState>,
        references: &ReferenceSet,
        namespaces: &NamespaceSet,
    ) -> Result<()> {
        let mut diagnostics = Diagnostics::new();

        for path in references.paths() {
            if !configuration.resolve_path(path).is_file() {
                diagnostics.push(missing_library(path));
            }
        }

        let exported = |namespace: &str| {
            configuration
                .references()
                .modules()
                .chain(references.modules())
                .any(|module| module.namespace() == namespace)
        };
        for namespace in namespaces.iter() {
            if !exported(namespace) {
                diagnostics.push(Diagnostic::error(format!(
                    "the namespace `{namespace}` does not exist (are you missing a reference?)"
                )));
            }
        }

        if !diagnostics.is_empty() {
            return Err(Error::compilation(diagnostics));
        }

        // New libraries run on a copy of the session state; the real load
        // happens again in the next run.
        let proposed = configuration
            .with_references(references)
            .with_namespaces(namespaces);
        let state = Self::initial_state(globals)?;
        let linker = Self::linker(&state, &proposed);
        Self::load_libraries(state, &proposed, &linker).map(|_| ())
    }
}

fn missing_library(path: &Path) -> Diagnostic {
    Diagnostic::error(format!("could not find library '{}'", path.display()))
}

fn in_library(mut error: Error, path: &Path) -> Error {
    let context = error
        .context
        .take()
        .unwrap_or_default()
        .with_source(path.display().to_string());
    error.with_context(context)
}
