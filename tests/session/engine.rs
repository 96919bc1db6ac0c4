//! The Stitch engine driven through the coordinator

use std::fs;

use stitch_foundation::{ErrorKind, Value};
use stitch_session::{
    ExecutionRequest, ScriptEngine, ScriptPackSession, SessionCoordinator, SessionOptions,
};
use tempfile::TempDir;

fn coordinator() -> SessionCoordinator<ScriptEngine> {
    SessionCoordinator::new(ScriptEngine::new(), SessionOptions::default())
}

fn run(
    coordinator: &SessionCoordinator<ScriptEngine>,
    session: &mut ScriptPackSession,
    code: &str,
) -> stitch_foundation::ExecutionOutcome {
    coordinator
        .execute(ExecutionRequest::new(code), session)
        .unwrap()
}

// =============================================================================
// Outcomes
// =============================================================================

#[test]
fn one_plus_one() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let outcome = run(&coordinator, &mut session, "1+1");
    assert_eq!(outcome.return_value(), Some(&Value::Int(2)));
}

#[test]
fn compile_error_on_first_call_leaves_no_continuation() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let outcome = run(&coordinator, &mut session, "int x = ");
    assert!(outcome.compilation_error().is_some());
    assert!(!coordinator.record(&session).unwrap().has_continuation());
}

#[test]
fn compile_error_leaves_session_usable() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    run(&coordinator, &mut session, "int x = 1;");

    let outcome = run(&coordinator, &mut session, "int y = ");
    assert!(outcome.compilation_error().unwrap().has_errors());

    let outcome = run(&coordinator, &mut session, "x + 1");
    assert_eq!(outcome.return_value(), Some(&Value::Int(2)));
}

#[test]
fn runtime_error_keeps_earlier_state() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    run(&coordinator, &mut session, "var total = 10;");

    let outcome = run(&coordinator, &mut session, "total = 20; total / 0");
    let error = outcome.execution_error().unwrap();
    assert!(matches!(error.kind, ErrorKind::DivisionByZero));

    let outcome = run(&coordinator, &mut session, "total");
    assert_eq!(outcome.return_value(), Some(&Value::Int(10)));
}

#[test]
fn native_failure_is_unwrapped() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let outcome = run(&coordinator, &mut session, "Math.Sqrt(-1)");
    let error = outcome.execution_error().unwrap();
    assert!(matches!(error.kind, ErrorKind::InvalidArgument(_)));
    let context = error.context.as_ref().unwrap();
    assert_eq!(context.stack, vec!["Math.Sqrt".to_string()]);
}

#[test]
fn args_are_visible_to_scripts() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let outcome = coordinator
        .execute(
            ExecutionRequest::new("Len(Args) + Len(Host.Args())").with_args(["a", "b"]),
            &mut session,
        )
        .unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(4)));
}

// =============================================================================
// Late inputs
// =============================================================================

#[test]
fn late_namespace_import() {
    let coordinator = SessionCoordinator::new(
        ScriptEngine::new(),
        SessionOptions::bare().with_module(stitch_language::math_module()),
    );
    let mut session = ScriptPackSession::empty();
    assert!(
        run(&coordinator, &mut session, "Pow(2, 3)")
            .compilation_error()
            .is_some()
    );

    let outcome = coordinator
        .execute(
            ExecutionRequest::new("Pow(2, 3)").with_namespace("Math"),
            &mut session,
        )
        .unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Float(8.0)));
}

#[test]
fn unknown_namespace_is_rejected() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    run(&coordinator, &mut session, "var x = 1;");

    let outcome = coordinator
        .execute(
            ExecutionRequest::new("x").with_namespace("Nope"),
            &mut session,
        )
        .unwrap();
    assert!(outcome.compilation_error().is_some());
    assert_eq!(
        run(&coordinator, &mut session, "x").return_value(),
        Some(&Value::Int(1))
    );
}

#[test]
fn late_library_runs_once() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("counter.stitch"), "var loads = 1;").unwrap();
    let coordinator = SessionCoordinator::new(
        ScriptEngine::new(),
        SessionOptions::default().with_base_directory(dir.path()),
    );
    let mut session = ScriptPackSession::empty();
    run(&coordinator, &mut session, "var before = true;");

    let request = ExecutionRequest::new("loads += 1; loads").with_reference("counter.stitch");
    let outcome = coordinator.execute(request.clone(), &mut session).unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(2)));
    let outcome = coordinator.execute(request, &mut session).unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(3)));
}

#[test]
fn missing_library_is_a_compile_error() {
    let dir = TempDir::new().unwrap();
    let coordinator = SessionCoordinator::new(
        ScriptEngine::new(),
        SessionOptions::default().with_base_directory(dir.path()),
    );
    let mut session = ScriptPackSession::empty();
    let outcome = coordinator
        .execute(
            ExecutionRequest::new("1").with_reference("absent.stitch"),
            &mut session,
        )
        .unwrap();
    let diagnostics = outcome.compilation_error().unwrap();
    assert!(diagnostics.first().unwrap().message.contains("absent.stitch"));
}

#[test]
fn failing_library_is_rejected_and_session_recovers() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.stitch"), "var y = 1 / 0;").unwrap();
    let coordinator = SessionCoordinator::new(
        ScriptEngine::new(),
        SessionOptions::default().with_base_directory(dir.path()),
    );
    let mut session = ScriptPackSession::empty();
    run(&coordinator, &mut session, "int x = 1;");

    let outcome = coordinator
        .execute(
            ExecutionRequest::new("x").with_reference("bad.stitch"),
            &mut session,
        )
        .unwrap();
    let error = outcome.execution_error().unwrap();
    assert!(matches!(error.kind, ErrorKind::DivisionByZero));
    assert_eq!(
        error.context.as_ref().unwrap().source.as_deref(),
        Some("bad.stitch")
    );
    let record = coordinator.record(&session).unwrap();
    assert!(record.baseline_references.paths().next().is_none());

    for _ in 0..2 {
        let outcome = run(&coordinator, &mut session, "x");
        assert_eq!(outcome.return_value(), Some(&Value::Int(1)));
    }
}

// =============================================================================
// Hosts
// =============================================================================

#[test]
fn new_host_after_failed_first_run_sees_new_args() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let outcome = coordinator
        .execute(ExecutionRequest::new("1 / 0").with_args(["old"]), &mut session)
        .unwrap();
    assert!(outcome.execution_error().is_some());

    let outcome = coordinator
        .execute(
            ExecutionRequest::new("[Args, Host.Args()]").with_args(["new", "args"]),
            &mut session,
        )
        .unwrap();
    let args = Value::list([Value::string("new"), Value::string("args")]);
    assert_eq!(
        outcome.return_value(),
        Some(&Value::list([args.clone(), args]))
    );
}
