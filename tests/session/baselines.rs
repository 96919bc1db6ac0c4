//! Property tests for session baselines

use proptest::prelude::*;
use stitch_foundation::{NamespaceSet, ReferenceSet};
use stitch_session::{ExecutionRequest, ScriptPackSession, SessionCoordinator, SessionOptions};

use crate::support::RecordingEngine;

#[derive(Clone, Debug)]
struct Call {
    paths: Vec<String>,
    namespaces: Vec<String>,
    code: &'static str,
}

fn call() -> impl Strategy<Value = Call> {
    (
        prop::collection::vec("[a-e]\\.stitch", 0..4),
        prop::collection::vec("[A-E]", 0..3),
        prop::sample::select(vec!["ok", "fail", "bad", " "]),
    )
        .prop_map(|(paths, namespaces, code)| Call {
            paths,
            namespaces,
            code,
        })
}

fn request(call: &Call) -> ExecutionRequest {
    let references: ReferenceSet = call.paths.iter().map(String::as_str).collect();
    let namespaces: NamespaceSet = call.namespaces.iter().cloned().collect();
    ExecutionRequest::new(call.code)
        .with_references(&references)
        .with_namespaces(&namespaces)
}

proptest! {
    #[test]
    fn baselines_grow_to_cover_every_call(calls in prop::collection::vec(call(), 1..12)) {
        let coordinator = SessionCoordinator::new(RecordingEngine::default(), SessionOptions::bare());
        let mut session = ScriptPackSession::empty();
        let mut seen_references = ReferenceSet::new();
        let mut seen_namespaces = NamespaceSet::new();

        for call in &calls {
            let request = request(call);
            seen_references = seen_references.union(&request.references);
            seen_namespaces = seen_namespaces.union(&request.namespaces);
            let previous = coordinator.record(&session).cloned();

            coordinator.execute(request, &mut session).unwrap();

            let record = coordinator.record(&session).unwrap();
            prop_assert_eq!(&record.baseline_references, &seen_references);
            prop_assert_eq!(&record.baseline_namespaces, &seen_namespaces);
            if let Some(previous) = previous {
                prop_assert!(record.baseline_references.is_superset_of(&previous.baseline_references));
                prop_assert!(record.baseline_namespaces.is_superset_of(&previous.baseline_namespaces));
                prop_assert!(record.configuration.version() >= previous.configuration.version());
            }
        }
    }

    #[test]
    fn validated_batches_never_repeat_inputs(calls in prop::collection::vec(call(), 1..12)) {
        let coordinator = SessionCoordinator::new(RecordingEngine::default(), SessionOptions::bare());
        let mut session = ScriptPackSession::empty();
        for call in &calls {
            coordinator.execute(request(call), &mut session).unwrap();
        }

        let validations = coordinator.engine().validations();
        for (i, later) in validations.iter().enumerate().skip(1) {
            for earlier in &validations[..i] {
                prop_assert!(later.references.except(&earlier.references) == later.references);
                prop_assert!(later.namespaces.except(&earlier.namespaces) == later.namespaces);
            }
        }
    }
}
