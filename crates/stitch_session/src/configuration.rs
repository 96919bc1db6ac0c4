//! Engine configuration snapshots.

use std::path::{Path, PathBuf};

use stitch_foundation::{NamespaceSet, ReferenceSet};

/// Everything an engine has been told about a session so far.
///
/// A configuration is immutable. [`with_references`](Self::with_references)
/// and [`with_namespaces`](Self::with_namespaces) return a new snapshot with
/// a higher version whenever they add something, so the references and
/// namespaces of a session only ever grow.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfiguration {
    version: u64,
    base_directory: PathBuf,
    references: ReferenceSet,
    namespaces: NamespaceSet,
}

impl EngineConfiguration {
    /// Creates an empty version-0 configuration.
    #[must_use]
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self::from_parts(base_directory, ReferenceSet::new(), NamespaceSet::new())
    }

    /// Creates a version-0 configuration with initial contents.
    #[must_use]
    pub fn from_parts(
        base_directory: impl Into<PathBuf>,
        references: ReferenceSet,
        namespaces: NamespaceSet,
    ) -> Self {
        Self {
            version: 0,
            base_directory: base_directory.into(),
            references,
            namespaces,
        }
    }

    /// Returns the snapshot version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the directory relative library paths are resolved against.
    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Returns every registered reference.
    #[must_use]
    pub const fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// Returns every imported namespace.
    #[must_use]
    pub const fn namespaces(&self) -> &NamespaceSet {
        &self.namespaces
    }

    /// Returns a snapshot that also registers `references`.
    #[must_use]
    pub fn with_references(&self, references: &ReferenceSet) -> Self {
        if self.references.is_superset_of(references) {
            return self.clone();
        }
        Self {
            version: self.version + 1,
            references: self.references.union(references),
            ..self.clone()
        }
    }

    /// Returns a snapshot that also imports `namespaces`.
    #[must_use]
    pub fn with_namespaces(&self, namespaces: &NamespaceSet) -> Self {
        if self.namespaces.is_superset_of(namespaces) {
            return self.clone();
        }
        Self {
            version: self.version + 1,
            namespaces: self.namespaces.union(namespaces),
            ..self.clone()
        }
    }

    /// Returns true if this snapshot holds everything `other` does.
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.references.is_superset_of(&other.references)
            && self.namespaces.is_superset_of(&other.namespaces)
    }

    /// Resolves a library path against the base directory.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_directory.join(path)
        }
    }
}
