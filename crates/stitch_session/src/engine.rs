//! The interface between a session and the engine that runs its code.

use stitch_foundation::{NamespaceSet, ReferenceSet, Result, Value};

use crate::configuration::EngineConfiguration;
use crate::host::ScriptHost;

/// Opaque state an engine hands back after a successful run.
///
/// The next run of the same session continues from it.
pub trait Continuation: Clone + Send + Sync + 'static {
    /// Returns the value of the run that produced this handle, if any.
    fn return_value(&self) -> Option<&Value>;
}

/// What a run starts from.
pub enum Globals<'a, H> {
    /// A fresh host; used for the first run of a session.
    Host(&'a ScriptHost),
    /// The handle of the previous successful run.
    Continuation(&'a H),
}

impl<H> Clone for Globals<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Globals<'_, H> {}

impl<H> Globals<'_, H> {
    /// Returns true if this run bootstraps a session.
    #[must_use]
    pub const fn is_host(&self) -> bool {
        matches!(self, Self::Host(_))
    }
}

/// Compiles and runs source code.
///
/// Engines must not mutate the globals they are given: a failed run leaves
/// the previous handle valid.
pub trait ExecutionEngine: Send + Sync {
    /// Continuation handle produced by a successful run.
    type Handle: Continuation;

    /// Runs `code` on top of `globals`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Compilation`](stitch_foundation::ErrorKind::Compilation)
    /// if the code does not compile, or any other error raised while running.
    fn run(
        &self,
        code: &str,
        globals: Globals<'_, Self::Handle>,
        configuration: &EngineConfiguration,
    ) -> Result<Self::Handle>;

    /// Checks that `references` and `namespaces` can be registered on top
    /// of `configuration` for a session currently at `globals`.
    ///
    /// Anything a later run would do on behalf of the batch (such as
    /// loading library scripts) must be checked here, so an accepted batch
    /// never makes later runs fail.
    ///
    /// # Errors
    ///
    /// Returns a compilation error describing every input that cannot be
    /// resolved, or the error raised while preparing the batch.
    fn validate(
        &self,
        configuration: &EngineConfiguration,
        globals: Globals<'_, Self::Handle>,
        references: &ReferenceSet,
        namespaces: &NamespaceSet,
    ) -> Result<()>;
}
