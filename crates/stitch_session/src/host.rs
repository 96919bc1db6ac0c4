//! Script hosts and the factory that builds them.

use stitch_foundation::{Error, ModuleRef, NativeModule, Result, Value};
use stitch_language::modules::expect_arity;

use crate::pack::PackContextRef;

/// Name of the host module.
pub const HOST_MODULE: &str = "stitch.host";
/// Namespace the host module exports.
pub const HOST_NAMESPACE: &str = "Host";

/// The object a session's first run starts from.
///
/// A host carries the script arguments and pack contexts, and exposes them
/// through its native [`module`](Self::module).
#[derive(Clone)]
pub struct ScriptHost {
    args: Vec<String>,
    contexts: Vec<PackContextRef>,
    module: ModuleRef,
}

impl ScriptHost {
    /// Creates a host over `contexts` and `args`.
    #[must_use]
    pub fn new(contexts: &[PackContextRef], args: &[String]) -> Self {
        let module = ModuleRef::new(HostModule {
            args: args.to_vec(),
            contexts: contexts.to_vec(),
        });
        Self {
            args: args.to_vec(),
            contexts: contexts.to_vec(),
            module,
        }
    }

    /// Returns the script arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the pack contexts.
    #[must_use]
    pub fn contexts(&self) -> &[PackContextRef] {
        &self.contexts
    }

    /// Returns the host module to register with the engine.
    #[must_use]
    pub const fn module(&self) -> &ModuleRef {
        &self.module
    }

    /// Returns the script arguments as a list value.
    #[must_use]
    pub fn args_value(&self) -> Value {
        Value::list(self.args.iter().map(Value::string))
    }
}

impl std::fmt::Debug for ScriptHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptHost")
            .field("args", &self.args)
            .field(
                "contexts",
                &self.contexts.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("module", &self.module)
            .finish()
    }
}

/// Builds a new host for every execution.
pub trait ScriptHostFactory: Send + Sync {
    /// Creates a host over the pack contexts and script arguments.
    fn create_host(&self, contexts: &[PackContextRef], args: &[String]) -> ScriptHost;
}

/// Builds plain [`ScriptHost`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHostFactory;

impl ScriptHostFactory for DefaultHostFactory {
    fn create_host(&self, contexts: &[PackContextRef], args: &[String]) -> ScriptHost {
        ScriptHost::new(contexts, args)
    }
}

/// `Host.Require(name)` and `Host.Args()`.
struct HostModule {
    args: Vec<String>,
    contexts: Vec<PackContextRef>,
}

impl NativeModule for HostModule {
    fn name(&self) -> &str {
        HOST_MODULE
    }

    fn namespace(&self) -> &str {
        HOST_NAMESPACE
    }

    fn has_function(&self, function: &str) -> bool {
        matches!(function, "Require" | "Args")
    }

    fn call(&self, function: &str, args: &[Value]) -> Result<Value> {
        match function {
            "Require" => {
                expect_arity(function, args, 1)?;
                let name = args[0]
                    .as_str()
                    .ok_or_else(|| Error::type_mismatch("string", args[0].type_name()))?;
                self.contexts
                    .iter()
                    .find(|context| context.name() == name)
                    .map(|context| context.value())
                    .ok_or_else(|| {
                        Error::invalid_argument(format!("no script pack context named '{name}'"))
                    })
            }
            "Args" => {
                expect_arity(function, args, 0)?;
                Ok(Value::list(self.args.iter().map(Value::string)))
            }
            _ => Err(Error::undefined_function(format!(
                "{HOST_NAMESPACE}.{function}"
            ))),
        }
    }
}
