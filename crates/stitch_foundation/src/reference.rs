//! Library references registered with an execution engine.
//!
//! A reference is either a file path the engine resolves itself, or a
//! native module that is already loaded in the host process. The two kinds
//! are registered through different calls, so [`ReferenceSet`] keeps them in
//! separate partitions.
//!
//! Sets are thin wrappers around the `im` crate's persistent ordered
//! collections: cloning is O(1) and every operation returns a new set.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::value::Value;

/// A module implemented in Rust that scripts can call into.
///
/// Every function a module exports lives in the module's namespace, so
/// `Math.Max(1, 2)` calls `Max` on the module whose namespace is `Math`.
pub trait NativeModule: Send + Sync {
    /// Unique module name. Two modules with the same name are the same reference.
    fn name(&self) -> &str;

    /// Namespace the module's functions are exported under.
    fn namespace(&self) -> &str;

    /// Returns true if the module exports a function with this name.
    fn has_function(&self, function: &str) -> bool;

    /// Calls an exported function.
    ///
    /// # Errors
    ///
    /// Returns an error if the function does not exist or fails.
    fn call(&self, function: &str, args: &[Value]) -> Result<Value>;
}

/// Shared handle to a native module, compared by module name.
#[derive(Clone)]
pub struct ModuleRef(Arc<dyn NativeModule>);

impl ModuleRef {
    /// Wraps a module.
    #[must_use]
    pub fn new(module: impl NativeModule + 'static) -> Self {
        Self(Arc::new(module))
    }

    /// Wraps an already shared module.
    #[must_use]
    pub fn from_arc(module: Arc<dyn NativeModule>) -> Self {
        Self(module)
    }

    /// Returns the module's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Returns the module's namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0.namespace()
    }

    /// Returns the underlying module.
    #[must_use]
    pub fn module(&self) -> &dyn NativeModule {
        self.0.as_ref()
    }
}

impl fmt::Debug for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleRef({})", self.name())
    }
}

impl PartialEq for ModuleRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for ModuleRef {}

impl Hash for ModuleRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

/// One reference, either kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reference {
    /// A file the engine resolves against its base directory.
    Path(PathBuf),
    /// A module already loaded in the process.
    Module(ModuleRef),
}

impl From<PathBuf> for Reference {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Reference {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for Reference {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<ModuleRef> for Reference {
    fn from(module: ModuleRef) -> Self {
        Self::Module(module)
    }
}

/// Persistent set of references with path and module partitions.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    paths: im::OrdSet<PathBuf>,
    modules: im::OrdMap<String, ModuleRef>,
}

impl ReferenceSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len() + self.modules.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.modules.is_empty()
    }

    /// Returns true if the set contains the reference.
    #[must_use]
    pub fn contains(&self, reference: &Reference) -> bool {
        match reference {
            Reference::Path(path) => self.paths.contains(path),
            Reference::Module(module) => self.modules.contains_key(module.name()),
        }
    }

    /// Returns a new set with the reference inserted.
    #[must_use]
    pub fn with(&self, reference: impl Into<Reference>) -> Self {
        let mut new = self.clone();
        match reference.into() {
            Reference::Path(path) => {
                new.paths.insert(path);
            }
            Reference::Module(module) => {
                if !new.modules.contains_key(module.name()) {
                    new.modules.insert(module.name().to_string(), module);
                }
            }
        }
        new
    }

    /// Returns a new set with the path inserted.
    #[must_use]
    pub fn with_path(&self, path: impl Into<PathBuf>) -> Self {
        self.with(Reference::Path(path.into()))
    }

    /// Returns a new set with the module inserted.
    #[must_use]
    pub fn with_module(&self, module: ModuleRef) -> Self {
        self.with(Reference::Module(module))
    }

    /// Returns a new set that is the union of this set and another.
    ///
    /// When both sets hold a module with the same name, this set's entry wins.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            paths: self.paths.clone().union(other.paths.clone()),
            modules: self.modules.clone().union(other.modules.clone()),
        }
    }

    /// Returns the references in this set that are not in `other`.
    #[must_use]
    pub fn except(&self, other: &Self) -> Self {
        Self {
            paths: self.paths.clone().relative_complement(other.paths.clone()),
            modules: self
                .modules
                .clone()
                .relative_complement(other.modules.clone()),
        }
    }

    /// Returns true if every reference in `other` is also in this set.
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.paths.is_subset(&self.paths)
            && other.modules.keys().all(|name| self.modules.contains_key(name))
    }

    /// Returns an iterator over the path partition.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// Returns an iterator over the module partition.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRef> {
        self.modules.values()
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ModuleRef> {
        self.modules.get(name)
    }

    /// Returns an iterator over every reference, paths first.
    pub fn iter(&self) -> impl Iterator<Item = Reference> + '_ {
        self.paths
            .iter()
            .cloned()
            .map(Reference::Path)
            .chain(self.modules.values().cloned().map(Reference::Module))
    }
}

impl fmt::Debug for ReferenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceSet")
            .field("paths", &self.paths.iter().collect::<Vec<_>>())
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<R: Into<Reference>> FromIterator<R> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, reference| set.with(reference))
    }
}
