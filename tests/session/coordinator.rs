//! Coordinator behaviour against a recording engine

use stitch_foundation::{ErrorKind, ExecutionOutcome, NamespaceSet, Reference, Value};
use stitch_session::{
    ExecutionRequest, HOST_MODULE, ScriptPackSession, SessionCoordinator, SessionOptions,
    SessionRecord,
};

use crate::support::{Depth, RecordingEngine};

fn coordinator() -> SessionCoordinator<RecordingEngine> {
    SessionCoordinator::new(RecordingEngine::default(), SessionOptions::bare())
}

fn record(
    coordinator: &SessionCoordinator<RecordingEngine>,
    session: &ScriptPackSession,
) -> SessionRecord<Depth> {
    coordinator.record(session).unwrap().clone()
}

// =============================================================================
// First call
// =============================================================================

#[test]
fn first_call_registers_everything_with_host_module() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let request = ExecutionRequest::new("ok")
        .with_reference("lib.stitch")
        .with_namespace("A");

    let outcome = coordinator.execute(request, &mut session).unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(1)));

    let validations = coordinator.engine().validations();
    assert_eq!(validations.len(), 1);
    assert!(validations[0].references.module(HOST_MODULE).is_some());
    assert!(validations[0].references.contains(&Reference::from("lib.stitch")));
    assert!(validations[0].namespaces.contains("A"));

    let record = record(&coordinator, &session);
    assert!(record.baseline_references.module(HOST_MODULE).is_none());
    assert!(record.baseline_namespaces.contains("A"));
    assert!(record.configuration.references().module(HOST_MODULE).is_some());
    assert_eq!(coordinator.engine().host_runs(), 1);
}

#[test]
fn first_call_runs_even_without_code() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let outcome = coordinator
        .execute(ExecutionRequest::new("  "), &mut session)
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(coordinator.engine().runs(), 1);
}

#[test]
fn rejected_first_call_stores_no_record() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();

    let outcome = coordinator
        .execute(
            ExecutionRequest::new("ok").with_namespace("Missing"),
            &mut session,
        )
        .unwrap();
    assert!(outcome.compilation_error().is_some());
    assert!(coordinator.record(&session).is_none());
    assert_eq!(coordinator.engine().runs(), 0);

    // The next call is a first call again.
    coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap();
    assert_eq!(coordinator.engine().host_runs(), 1);
}

// =============================================================================
// Continuation
// =============================================================================

#[test]
fn continuation_builds_on_previous_handle() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    for expected in 1..=3 {
        let outcome = coordinator
            .execute(ExecutionRequest::new("ok"), &mut session)
            .unwrap();
        assert_eq!(outcome.return_value(), Some(&Value::Int(expected)));
    }
    assert_eq!(coordinator.engine().host_runs(), 1);
}

#[test]
fn identical_calls_register_nothing_new() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let request = ExecutionRequest::new("ok")
        .with_reference("lib.stitch")
        .with_namespace("A");

    coordinator.execute(request.clone(), &mut session).unwrap();
    let version = record(&coordinator, &session).configuration.version();
    coordinator.execute(request, &mut session).unwrap();

    assert_eq!(coordinator.engine().validations().len(), 1);
    assert_eq!(
        record(&coordinator, &session).configuration.version(),
        version
    );
}

#[test]
fn only_new_inputs_are_registered() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    coordinator
        .execute(
            ExecutionRequest::new("ok")
                .with_reference("a.stitch")
                .with_namespace("A"),
            &mut session,
        )
        .unwrap();
    coordinator
        .execute(
            ExecutionRequest::new("ok")
                .with_reference("a.stitch")
                .with_reference("b.stitch")
                .with_namespace("A")
                .with_namespace("B"),
            &mut session,
        )
        .unwrap();

    // First call, then one batch with everything new.
    let validations = coordinator.engine().validations();
    assert_eq!(validations.len(), 2);
    assert_eq!(validations[1].references.len(), 1);
    assert!(validations[1].references.contains(&Reference::from("b.stitch")));
    assert_eq!(
        validations[1].namespaces,
        ["B"].into_iter().collect::<NamespaceSet>()
    );
}

#[test]
fn whitespace_chunk_is_empty_but_registers_inputs() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap();

    let outcome = coordinator
        .execute(
            ExecutionRequest::new(" \n\t").with_reference("late.stitch"),
            &mut session,
        )
        .unwrap();
    assert!(outcome.is_empty());
    assert_eq!(coordinator.engine().runs(), 1);
    assert!(
        record(&coordinator, &session)
            .baseline_references
            .contains(&Reference::from("late.stitch"))
    );
}

#[test]
fn rejected_batch_is_not_applied() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap();
    let before = record(&coordinator, &session);

    let outcome = coordinator
        .execute(
            ExecutionRequest::new("ok").with_namespace("Missing"),
            &mut session,
        )
        .unwrap();
    assert!(outcome.compilation_error().is_some());
    assert_eq!(coordinator.engine().runs(), 1);

    let after = record(&coordinator, &session);
    assert!(!after.baseline_namespaces.contains("Missing"));
    assert_eq!(after.configuration.version(), before.configuration.version());

    let outcome = coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(2)));
}

#[test]
fn mixed_batch_is_rejected_as_a_whole() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap();
    let before = record(&coordinator, &session);

    let outcome = coordinator
        .execute(
            ExecutionRequest::new("ok")
                .with_reference("good.stitch")
                .with_namespace("Missing"),
            &mut session,
        )
        .unwrap();
    assert!(outcome.compilation_error().is_some());

    let validations = coordinator.engine().validations();
    assert_eq!(validations.len(), 2);
    assert!(validations[1].references.contains(&Reference::from("good.stitch")));
    assert!(validations[1].namespaces.contains("Missing"));

    let after = record(&coordinator, &session);
    assert!(!after.baseline_references.contains(&Reference::from("good.stitch")));
    assert!(!after.baseline_namespaces.contains("Missing"));
    assert_eq!(after.configuration.version(), before.configuration.version());
    assert!(after.configuration.references().paths().next().is_none());

    // Resubmitting the good half alone is accepted.
    coordinator
        .execute(
            ExecutionRequest::new("ok").with_reference("good.stitch"),
            &mut session,
        )
        .unwrap();
    assert!(
        record(&coordinator, &session)
            .baseline_references
            .contains(&Reference::from("good.stitch"))
    );
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn failed_run_keeps_previous_handle() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap();

    let outcome = coordinator
        .execute(ExecutionRequest::new("fail"), &mut session)
        .unwrap();
    let error = outcome.execution_error().unwrap();
    assert!(matches!(error.kind, ErrorKind::Thrown(_)));

    let outcome = coordinator
        .execute(ExecutionRequest::new("bad"), &mut session)
        .unwrap();
    assert!(outcome.compilation_error().is_some());

    let outcome = coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(2)));
}

#[test]
fn failed_first_run_falls_back_to_host() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    let outcome = coordinator
        .execute(ExecutionRequest::new("fail"), &mut session)
        .unwrap();
    assert!(matches!(outcome, ExecutionOutcome::ExecutionError(_)));
    assert!(!record(&coordinator, &session).has_continuation());

    let outcome = coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(1)));
    assert_eq!(coordinator.engine().host_runs(), 2);
}

#[test]
fn terminated_session_is_rejected() {
    let coordinator = coordinator();
    let mut session = ScriptPackSession::empty();
    session.terminate();
    let err = coordinator
        .execute(ExecutionRequest::new("ok"), &mut session)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    assert_eq!(coordinator.engine().runs(), 0);
}
