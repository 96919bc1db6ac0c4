//! Function resolution against referenced modules and imported namespaces.

use stitch_foundation::{Error, ErrorKind, ModuleRef, Result};

/// The functions a chunk can call.
///
/// A qualified call (`Math.Max`) needs a referenced module exporting the
/// namespace. A bare call (`Max`) additionally needs the namespace imported.
#[derive(Clone, Debug, Default)]
pub struct Linker {
    modules: Vec<ModuleRef>,
    imports: Vec<String>,
}

impl Linker {
    /// Creates a linker over the given modules and imports.
    #[must_use]
    pub fn new<S: Into<String>>(
        modules: impl IntoIterator<Item = ModuleRef>,
        imports: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut linker = Self::default();
        for module in modules {
            linker.add_module(module);
        }
        for namespace in imports {
            linker.import(namespace);
        }
        linker
    }

    /// Adds a module unless one with the same name is already present.
    pub fn add_module(&mut self, module: ModuleRef) {
        if !self.modules.contains(&module) {
            self.modules.push(module);
        }
    }

    /// Imports a namespace for bare calls.
    pub fn import(&mut self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        if !self.imports.contains(&namespace) {
            self.imports.push(namespace);
        }
    }

    /// Returns true if some module exports the namespace.
    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.modules.iter().any(|m| m.namespace() == namespace)
    }

    /// Resolves a call to the module that implements it.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace or function does not exist, or a
    /// bare call matches more than one imported namespace.
    pub fn resolve(&self, namespace: &[String], function: &str) -> Result<&ModuleRef> {
        if !namespace.is_empty() {
            let namespace = namespace.join(".");
            if !self.has_namespace(&namespace) {
                return Err(Error::new(ErrorKind::NamespaceNotFound(namespace)));
            }
            return self
                .modules
                .iter()
                .find(|m| m.namespace() == namespace && m.module().has_function(function))
                .ok_or_else(|| Error::undefined_function(format!("{namespace}.{function}")));
        }

        let mut found: Vec<&ModuleRef> = Vec::new();
        for import in &self.imports {
            if let Some(module) = self
                .modules
                .iter()
                .find(|m| m.namespace() == import && m.module().has_function(function))
            {
                found.push(module);
            }
        }

        match found.as_slice() {
            [] => Err(Error::undefined_function(function)),
            [module] => Ok(*module),
            many => Err(Error::new(ErrorKind::AmbiguousCall {
                function: function.to_string(),
                namespaces: many.iter().map(|m| m.namespace().to_string()).collect(),
            })),
        }
    }
}
