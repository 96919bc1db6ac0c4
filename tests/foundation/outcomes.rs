//! Integration tests for execution outcomes

use stitch_foundation::{Diagnostic, Error, ExecutionOutcome, Value};

#[test]
fn success_carries_optional_value() {
    let with_value = ExecutionOutcome::Success(Some(Value::Int(2)));
    assert!(with_value.is_success());
    assert_eq!(with_value.return_value(), Some(&Value::Int(2)));

    let without = ExecutionOutcome::Success(None);
    assert!(without.is_success());
    assert_eq!(without.return_value(), None);
}

#[test]
fn exactly_one_payload() {
    let compile = ExecutionOutcome::CompilationError(Diagnostic::error("bad").into());
    assert!(compile.compilation_error().is_some());
    assert!(compile.execution_error().is_none());
    assert!(!compile.is_success());

    let runtime = ExecutionOutcome::ExecutionError(Error::thrown("x"));
    assert!(runtime.execution_error().is_some());
    assert!(runtime.compilation_error().is_none());

    let empty = ExecutionOutcome::Empty;
    assert!(empty.is_empty());
    assert!(empty.return_value().is_none());
}

#[test]
fn display_shows_values_as_source() {
    let outcome = ExecutionOutcome::Success(Some(Value::string("hi")));
    assert_eq!(outcome.to_string(), "\"hi\"");
    assert_eq!(ExecutionOutcome::Empty.to_string(), "");
}
