//! Persistent set of imported namespace names.

use std::fmt;

/// Persistent set of namespace names (`Math`, `Text.Format`, ...).
///
/// Cloning is O(1). Modifications return a new set sharing structure with
/// the original.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct NamespaceSet(im::OrdSet<String>);

impl NamespaceSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(im::OrdSet::new())
    }

    /// Returns the number of namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the set contains the namespace.
    #[must_use]
    pub fn contains(&self, namespace: &str) -> bool {
        self.0.contains(namespace)
    }

    /// Returns a new set with the namespace inserted.
    #[must_use]
    pub fn with(&self, namespace: impl Into<String>) -> Self {
        let mut new = self.0.clone();
        new.insert(namespace.into());
        Self(new)
    }

    /// Returns a new set that is the union of this set and another.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.clone().union(other.0.clone()))
    }

    /// Returns the namespaces in this set that are not in `other`.
    #[must_use]
    pub fn except(&self, other: &Self) -> Self {
        Self(self.0.clone().relative_complement(other.0.clone()))
    }

    /// Returns true if every namespace in `other` is also in this set.
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.0.is_subset(&self.0)
    }

    /// Returns an iterator over the namespaces in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Debug for NamespaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<S: Into<String>> FromIterator<S> for NamespaceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
