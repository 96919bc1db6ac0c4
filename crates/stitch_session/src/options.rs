//! Session defaults.

use std::path::PathBuf;

use stitch_foundation::{ModuleRef, NamespaceSet, Reference, ReferenceSet};
use stitch_language::{core_module, math_module};

use crate::configuration::EngineConfiguration;

/// Defaults applied to every new session.
///
/// Every session starts from [`engine_configuration`](Self::engine_configuration)
/// and grows from there.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Directory relative library paths are resolved against.
    pub base_directory: PathBuf,

    /// Native modules referenced by default.
    pub modules: Vec<ModuleRef>,

    /// Namespaces imported by default.
    pub namespaces: Vec<String>,

    /// Library scripts referenced by default.
    pub paths: Vec<PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            base_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            modules: vec![core_module(), math_module()],
            namespaces: vec!["Core".to_string()],
            paths: Vec::new(),
        }
    }
}

impl SessionOptions {
    /// Creates options with no default modules, namespaces, or paths.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            modules: Vec::new(),
            namespaces: Vec::new(),
            ..Self::default()
        }
    }

    /// Builder method to set the base directory.
    #[must_use]
    pub fn with_base_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_directory = dir.into();
        self
    }

    /// Builder method to add a default native module.
    #[must_use]
    pub fn with_module(mut self, module: ModuleRef) -> Self {
        self.modules.push(module);
        self
    }

    /// Builder method to add a default namespace import.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    /// Builder method to add a default library script.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Returns the default references as a set.
    #[must_use]
    pub fn references(&self) -> ReferenceSet {
        let paths = self.paths.iter().cloned().map(Reference::Path);
        let modules = self.modules.iter().cloned().map(Reference::Module);
        paths.chain(modules).collect()
    }

    /// Returns the default namespaces as a set.
    #[must_use]
    pub fn namespace_set(&self) -> NamespaceSet {
        self.namespaces.iter().cloned().collect()
    }

    /// Builds the version-0 configuration new sessions start from.
    #[must_use]
    pub fn engine_configuration(&self) -> EngineConfiguration {
        EngineConfiguration::from_parts(
            self.base_directory.clone(),
            self.references(),
            self.namespace_set(),
        )
    }
}
