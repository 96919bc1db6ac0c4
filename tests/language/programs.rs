//! End-to-end chunk execution tests

use stitch_foundation::{ErrorKind, Value};
use stitch_language::{Execution, Linker, Scope, core_module, execute, math_module};

fn linker() -> Linker {
    Linker::new([core_module(), math_module()], ["Core", "Math"])
}

fn run_chunks(chunks: &[&str]) -> Vec<Execution> {
    let linker = linker();
    let mut scope = Scope::new();
    let mut results = Vec::new();
    for chunk in chunks {
        let execution = execute(chunk, scope.clone(), &linker).unwrap();
        scope = execution.scope.clone();
        results.push(execution);
    }
    results
}

// =============================================================================
// Chunk sequences
// =============================================================================

#[test]
fn state_flows_between_chunks() {
    let results = run_chunks(&[
        "int count = 1;",
        "string label = \"n\";",
        "count += 41;",
        "label + \"=\" + count",
    ]);
    assert_eq!(
        results.last().unwrap().return_value,
        Some(Value::string("n=42"))
    );
}

#[test]
fn redeclaration_replaces_binding() {
    let results = run_chunks(&["int x = 1;", "string x = \"one\";", "x"]);
    assert_eq!(
        results.last().unwrap().return_value,
        Some(Value::string("one"))
    );
}

#[test]
fn only_final_unterminated_expression_is_returned() {
    let results = run_chunks(&["1; 2; 3", "4; 5;"]);
    assert_eq!(results[0].return_value, Some(Value::Int(3)));
    assert_eq!(results[1].return_value, None);
}

// =============================================================================
// Types
// =============================================================================

#[test]
fn typed_declarations() {
    let results = run_chunks(&[
        "long big = 5000000000; double half = 1; bool flag = !false;",
        "[big, half, flag]",
    ]);
    assert_eq!(
        results[1].return_value,
        Some(Value::list([
            Value::Int(5_000_000_000),
            Value::Float(1.0),
            Value::Bool(true)
        ]))
    );
}

#[test]
fn typed_assignment_is_checked() {
    let first = execute("int n = 1;", Scope::new(), &linker()).unwrap();
    let err = execute("n = \"two\";", first.scope, &linker()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn string_indexing_by_character() {
    let result = execute("\"héllo\"[1]", Scope::new(), &linker()).unwrap();
    assert_eq!(result.return_value, Some(Value::string("é")));
}

#[test]
fn comparisons() {
    let result = execute(
        "[1 < 2, 2.5 >= 2, \"a\" < \"b\", 1 == 1.0, \"x\" != \"y\"]",
        Scope::new(),
        &linker(),
    )
    .unwrap();
    assert_eq!(
        result.return_value,
        Some(Value::list(vec![Value::Bool(true); 5]))
    );
}

// =============================================================================
// Built-in modules
// =============================================================================

#[test]
fn core_functions() {
    let result = execute(
        "[Len(\"abc\"), Str(12), Int(\"7\"), Type(1.5)]",
        Scope::new(),
        &linker(),
    )
    .unwrap();
    assert_eq!(
        result.return_value,
        Some(Value::list([
            Value::Int(3),
            Value::string("12"),
            Value::Int(7),
            Value::string("double")
        ]))
    );
}

#[test]
fn math_functions() {
    let result = execute("Max(3, Abs(-9)) + Math.Min(1, 2)", Scope::new(), &linker()).unwrap();
    assert_eq!(result.return_value, Some(Value::Int(10)));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn incomplete_declaration_is_a_compile_error() {
    let err = execute("int x = ", Scope::new(), &linker()).unwrap_err();
    let diagnostics = err.diagnostics().unwrap();
    assert!(diagnostics.has_errors());
}

#[test]
fn every_unresolved_name_is_reported() {
    let err = execute("a + b", Scope::new(), &linker()).unwrap_err();
    assert_eq!(err.diagnostics().unwrap().len(), 2);
}

#[test]
fn runtime_error_reports_position() {
    let err = execute("var x = 1;\nx / 0", Scope::new(), &linker()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DivisionByZero));
    assert_eq!(err.context.unwrap().line, Some(2));
}
