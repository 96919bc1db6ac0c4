//! Script files run through the runner

use std::fs;

use stitch::runtime::ScriptRunner;
use stitch_foundation::{ErrorKind, Value};
use stitch_session::{ScriptEngine, ScriptPackSession, SessionCoordinator, SessionOptions};
use tempfile::TempDir;

fn coordinator(dir: &TempDir) -> SessionCoordinator<ScriptEngine> {
    SessionCoordinator::new(
        ScriptEngine::new(),
        SessionOptions::default().with_base_directory(dir.path()),
    )
}

#[test]
fn script_with_library_and_imports() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("shapes.stitch"),
        "double pi = 3.5;\nvar sides = [3, 4, 5];",
    )
    .unwrap();
    let script = dir.path().join("main.stitch");
    fs::write(
        &script,
        "// area\n#r \"shapes.stitch\"\nusing Math;\n\nMax(sides[0], sides[2]) * pi",
    )
    .unwrap();

    let coordinator = coordinator(&dir);
    let mut session = ScriptPackSession::empty();
    let outcome = ScriptRunner::new(&coordinator)
        .run_file(&script, &mut session)
        .unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Float(17.5)));
}

#[test]
fn compile_errors_keep_script_line_numbers() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("broken.stitch");
    fs::write(&script, "using Math;\n\nvar x = ;").unwrap();

    let coordinator = coordinator(&dir);
    let mut session = ScriptPackSession::empty();
    let outcome = ScriptRunner::new(&coordinator)
        .run_file(&script, &mut session)
        .unwrap();
    let diagnostics = outcome.compilation_error().unwrap();
    assert_eq!(diagnostics.first().unwrap().line, Some(3));
}

#[test]
fn failing_library_reports_its_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.stitch"), "throw \"broken library\";").unwrap();
    let script = dir.path().join("main.stitch");
    fs::write(&script, "#r \"bad.stitch\"\n1").unwrap();

    let coordinator = coordinator(&dir);
    let mut session = ScriptPackSession::empty();
    let outcome = ScriptRunner::new(&coordinator)
        .run_file(&script, &mut session)
        .unwrap();
    let error = outcome.execution_error().unwrap();
    assert!(matches!(error.kind, ErrorKind::Thrown(_)));
    assert_eq!(
        error.context.as_ref().unwrap().source.as_deref(),
        Some("bad.stitch")
    );
}

#[test]
fn scripts_share_a_session() {
    let dir = TempDir::new().unwrap();
    let setup = dir.path().join("setup.stitch");
    let report = dir.path().join("report.stitch");
    fs::write(&setup, "var name = Args[0];").unwrap();
    fs::write(&report, "\"hello \" + name").unwrap();

    let coordinator = coordinator(&dir);
    let runner = ScriptRunner::new(&coordinator).with_args(vec!["world".to_string()]);
    let mut session = ScriptPackSession::empty();
    runner.run_file(&setup, &mut session).unwrap();
    let outcome = runner.run_file(&report, &mut session).unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::string("hello world")));
}
