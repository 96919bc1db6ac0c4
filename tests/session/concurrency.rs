//! Independent sessions sharing one coordinator

use std::thread;

use stitch_foundation::Value;
use stitch_session::{
    ExecutionRequest, ScriptEngine, ScriptPackSession, SessionCoordinator, SessionOptions,
};

#[test]
fn sessions_on_many_threads_stay_isolated() {
    let coordinator = SessionCoordinator::new(ScriptEngine::new(), SessionOptions::default());

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8_i64)
            .map(|i| {
                let coordinator = &coordinator;
                scope.spawn(move || {
                    let mut session = ScriptPackSession::empty();
                    coordinator
                        .execute(ExecutionRequest::new(format!("var n = {i};")), &mut session)
                        .unwrap();
                    for _ in 0..10 {
                        coordinator
                            .execute(ExecutionRequest::new("n += 1;"), &mut session)
                            .unwrap();
                    }
                    coordinator
                        .execute(ExecutionRequest::new("n"), &mut session)
                        .unwrap()
                })
            })
            .collect();

        for (i, handle) in (0..8_i64).zip(handles) {
            let outcome = handle.join().unwrap();
            assert_eq!(outcome.return_value(), Some(&Value::Int(i + 10)));
        }
    });
}
