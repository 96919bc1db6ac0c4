//! Script packs and the session that owns them.
//!
//! A script pack contributes references, namespace imports, and a context
//! object to every chunk run in a session. The [`ScriptPackSession`] also
//! owns the typed [`StateStore`] where per-session state lives between calls.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use stitch_foundation::{NamespaceSet, Reference, ReferenceSet, Value};

/// A named object a pack exposes to scripts through `Host.Require`.
pub trait ScriptPackContext: Send + Sync {
    /// Name scripts use to look the context up.
    fn name(&self) -> &str;

    /// Value handed to scripts.
    fn value(&self) -> Value;
}

/// Shared handle to a pack context.
pub type PackContextRef = Arc<dyn ScriptPackContext>;

/// A bundle of references, imports, and context for scripts.
pub trait ScriptPack: Send + Sync {
    /// Adds the pack's references and namespaces.
    fn initialize(&self, initializer: &mut PackInitializer);

    /// Returns the context object exposed to scripts, if any.
    fn context(&self) -> Option<PackContextRef> {
        None
    }

    /// Releases the pack's resources when its session ends.
    fn terminate(&self) {}
}

/// Collects what packs contribute during initialization.
#[derive(Debug, Default)]
pub struct PackInitializer {
    references: ReferenceSet,
    namespaces: NamespaceSet,
}

impl PackInitializer {
    /// Adds a reference.
    pub fn add_reference(&mut self, reference: impl Into<Reference>) {
        self.references = self.references.with(reference);
    }

    /// Adds a namespace import.
    pub fn import(&mut self, namespace: impl Into<String>) {
        self.namespaces = self.namespaces.with(namespace);
    }
}

/// Session-scoped state keyed by Rust type.
#[derive(Default)]
pub struct StateStore {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl StateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a value of type `T` is stored.
    #[must_use]
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Gets the stored value of type `T`.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref())
    }

    /// Gets the stored value of type `T` mutably.
    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_mut())
    }

    /// Stores a value, returning the one it replaced.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.entries
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast().ok())
            .map(|old| *old)
    }

    /// Removes and returns the stored value of type `T`.
    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|old| old.downcast().ok())
            .map(|old| *old)
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// The packs of one logical session plus its cross-call state.
pub struct ScriptPackSession {
    packs: Vec<Box<dyn ScriptPack>>,
    contexts: Vec<PackContextRef>,
    references: ReferenceSet,
    namespaces: NamespaceSet,
    state: StateStore,
    terminated: bool,
}

impl ScriptPackSession {
    /// Initializes every pack and collects its contributions.
    #[must_use]
    pub fn new(packs: Vec<Box<dyn ScriptPack>>) -> Self {
        let mut initializer = PackInitializer::default();
        let mut contexts = Vec::new();
        for pack in &packs {
            pack.initialize(&mut initializer);
            if let Some(context) = pack.context() {
                contexts.push(context);
            }
        }
        tracing::debug!(
            packs = packs.len(),
            references = initializer.references.len(),
            namespaces = initializer.namespaces.len(),
            "script packs initialized"
        );

        Self {
            packs,
            contexts,
            references: initializer.references,
            namespaces: initializer.namespaces,
            state: StateStore::new(),
            terminated: false,
        }
    }

    /// Creates a session without packs.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns the references contributed by packs.
    #[must_use]
    pub const fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// Returns the namespaces contributed by packs.
    #[must_use]
    pub const fn namespaces(&self) -> &NamespaceSet {
        &self.namespaces
    }

    /// Returns the pack contexts.
    #[must_use]
    pub fn contexts(&self) -> &[PackContextRef] {
        &self.contexts
    }

    /// Returns the session state store.
    #[must_use]
    pub const fn state(&self) -> &StateStore {
        &self.state
    }

    /// Returns the session state store mutably.
    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }

    /// Returns true once [`terminate`](Self::terminate) has run.
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Terminates every pack once and drops the session state.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        for pack in &self.packs {
            pack.terminate();
        }
        self.state = StateStore::new();
        self.terminated = true;
        tracing::debug!(packs = self.packs.len(), "script pack session terminated");
    }
}

impl Drop for ScriptPackSession {
    fn drop(&mut self) {
        self.terminate();
    }
}

impl std::fmt::Debug for ScriptPackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptPackSession")
            .field("packs", &self.packs.len())
            .field("contexts", &self.contexts.len())
            .field("references", &self.references)
            .field("namespaces", &self.namespaces)
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
