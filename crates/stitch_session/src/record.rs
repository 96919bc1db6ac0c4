//! Per-session bookkeeping kept between executions.

use stitch_foundation::{NamespaceSet, ReferenceSet};

use crate::configuration::EngineConfiguration;
use crate::engine::Globals;
use crate::host::ScriptHost;

/// What a session has registered and where its last successful run left off.
///
/// Stored in the pack session's state store, keyed by the handle type, so
/// one pack session can host one record per engine kind.
#[derive(Clone, Debug)]
pub struct SessionRecord<H> {
    /// References already registered with the engine.
    pub baseline_references: ReferenceSet,

    /// Namespaces already imported.
    pub baseline_namespaces: NamespaceSet,

    /// Handle of the last successful run; `None` until one succeeds.
    pub continuation: Option<H>,

    /// The session's engine configuration.
    pub configuration: EngineConfiguration,
}

impl<H> SessionRecord<H> {
    /// Creates a record with no continuation yet.
    #[must_use]
    pub const fn new(
        baseline_references: ReferenceSet,
        baseline_namespaces: NamespaceSet,
        configuration: EngineConfiguration,
    ) -> Self {
        Self {
            baseline_references,
            baseline_namespaces,
            continuation: None,
            configuration,
        }
    }

    /// Returns true once a run has succeeded.
    #[must_use]
    pub const fn has_continuation(&self) -> bool {
        self.continuation.is_some()
    }

    /// What the next run starts from: the continuation, or `host` if no run
    /// has succeeded yet.
    #[must_use]
    pub fn globals<'a>(&'a self, host: &'a ScriptHost) -> Globals<'a, H> {
        match &self.continuation {
            Some(previous) => Globals::Continuation(previous),
            None => Globals::Host(host),
        }
    }
}
