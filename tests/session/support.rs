//! A recording engine for coordinator tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use stitch_foundation::{Diagnostic, Error, NamespaceSet, ReferenceSet, Result, Value};
use stitch_session::{Continuation, EngineConfiguration, ExecutionEngine, Globals};

/// Counts how many runs led to this handle.
#[derive(Clone, Debug)]
pub struct Depth {
    pub depth: i64,
    value: Option<Value>,
}

impl Continuation for Depth {
    fn return_value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

/// One `validate` call.
#[derive(Clone, Debug)]
pub struct Validation {
    pub references: ReferenceSet,
    pub namespaces: NamespaceSet,
}

/// Engine that records every call.
///
/// `fail` raises a wrapped runtime error, `bad` fails to compile, anything
/// else returns the depth of the continuation chain. Validation rejects the
/// namespace `Missing`.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    runs: AtomicUsize,
    host_runs: AtomicUsize,
    validations: Mutex<Vec<Validation>>,
}

impl RecordingEngine {
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn host_runs(&self) -> usize {
        self.host_runs.load(Ordering::SeqCst)
    }

    pub fn validations(&self) -> Vec<Validation> {
        self.validations.lock().unwrap().clone()
    }
}

impl ExecutionEngine for RecordingEngine {
    type Handle = Depth;

    fn run(
        &self,
        code: &str,
        globals: Globals<'_, Depth>,
        _configuration: &EngineConfiguration,
    ) -> Result<Depth> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if globals.is_host() {
            self.host_runs.fetch_add(1, Ordering::SeqCst);
        }
        let depth = match globals {
            Globals::Host(_) => 1,
            Globals::Continuation(previous) => previous.depth + 1,
        };
        match code.trim() {
            "fail" => Err(Error::aggregate(vec![Error::thrown("fail")])),
            "bad" => Err(Error::compilation(Diagnostic::error_at("bad", 1, 1))),
            _ => Ok(Depth {
                depth,
                value: Some(Value::Int(depth)),
            }),
        }
    }

    fn validate(
        &self,
        _configuration: &EngineConfiguration,
        _globals: Globals<'_, Depth>,
        references: &ReferenceSet,
        namespaces: &NamespaceSet,
    ) -> Result<()> {
        self.validations.lock().unwrap().push(Validation {
            references: references.clone(),
            namespaces: namespaces.clone(),
        });
        if namespaces.contains("Missing") {
            return Err(Error::compilation(Diagnostic::error(
                "the namespace `Missing` does not exist",
            )));
        }
        Ok(())
    }
}
