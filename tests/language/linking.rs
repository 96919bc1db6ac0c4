//! Function resolution through references and imports

use stitch_foundation::{Error, ErrorKind, ModuleRef, NativeModule, Result, Value};
use stitch_language::{Linker, Scope, core_module, execute, math_module};

/// A second module exporting `Max`, to collide with `Math.Max`.
struct Stats;

impl NativeModule for Stats {
    fn name(&self) -> &str {
        "test.stats"
    }

    fn namespace(&self) -> &str {
        "Stats"
    }

    fn has_function(&self, function: &str) -> bool {
        function == "Max"
    }

    fn call(&self, function: &str, args: &[Value]) -> Result<Value> {
        match function {
            "Max" => Ok(Value::Int(i64::try_from(args.len()).unwrap())),
            _ => Err(Error::undefined_function(function)),
        }
    }
}

#[test]
fn qualified_call_needs_reference() {
    let without = Linker::new([core_module()], ["Core"]);
    let err = execute("Math.Max(1, 2)", Scope::new(), &without).unwrap_err();
    assert!(err.diagnostics().is_some());

    let with = Linker::new([core_module(), math_module()], ["Core"]);
    let result = execute("Math.Max(1, 2)", Scope::new(), &with).unwrap();
    assert_eq!(result.return_value, Some(Value::Int(2)));
}

#[test]
fn bare_call_needs_import() {
    let linker = Linker::new([core_module(), math_module()], ["Core"]);
    let err = execute("Max(1, 2)", Scope::new(), &linker).unwrap_err();
    assert!(err.diagnostics().is_some());
}

#[test]
fn bare_call_in_two_namespaces_is_ambiguous() {
    let linker = Linker::new(
        [math_module(), ModuleRef::new(Stats)],
        ["Math", "Stats"],
    );
    let err = linker.resolve(&[], "Max").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AmbiguousCall { .. }));

    let result = execute("Stats.Max(1, 2, 3)", Scope::new(), &linker).unwrap();
    assert_eq!(result.return_value, Some(Value::Int(3)));
}

#[test]
fn modules_deduplicate_by_name() {
    let mut linker = Linker::default();
    linker.add_module(math_module());
    linker.add_module(math_module());
    linker.import("Math");
    assert!(linker.has_namespace("Math"));
    assert!(linker.resolve(&[], "Pow").is_ok());
}
