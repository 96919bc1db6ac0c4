//! Integration tests for errors and diagnostics

use stitch_foundation::{Diagnostic, Diagnostics, Error, ErrorContext, ErrorKind};

#[test]
fn compilation_error_exposes_diagnostics() {
    let diagnostics: Diagnostics = [
        Diagnostic::error_at("first", 1, 2),
        Diagnostic::error("second"),
    ]
    .into_iter()
    .collect();
    let err = Error::compilation(diagnostics);

    let found = err.diagnostics().unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.has_errors());
    assert_eq!(found.first().unwrap().line, Some(1));
}

#[test]
fn non_compilation_errors_have_no_diagnostics() {
    assert!(Error::invalid_argument("x").diagnostics().is_none());
    assert!(Error::aggregate(vec![]).diagnostics().is_none());
}

#[test]
fn aggregate_keeps_inner_errors() {
    let err = Error::aggregate(vec![Error::new(ErrorKind::DivisionByZero)]);
    match &err.kind {
        ErrorKind::Aggregate(inner) => {
            assert_eq!(inner.len(), 1);
            assert!(matches!(inner[0].kind, ErrorKind::DivisionByZero));
        }
        other => panic!("expected aggregate, got {other:?}"),
    }
}

#[test]
fn context_is_attached() {
    let err = Error::thrown("boom").with_context(
        ErrorContext::new()
            .with_source("main.stitch")
            .with_position(3, 7)
            .with_frame("Math.Sqrt"),
    );
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("main.stitch"));
    assert_eq!((context.line, context.column), (Some(3), Some(7)));
    assert_eq!(context.stack, vec!["Math.Sqrt".to_string()]);
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: Error = io.into();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
}
