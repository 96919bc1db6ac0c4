//! Scripted REPL sessions

use std::fs;

use stitch::runtime::{LineEditor, ReadResult, Repl};
use stitch_foundation::{Result, Value};
use stitch_session::SessionOptions;
use tempfile::TempDir;

/// Replays a fixed list of lines, then reports EOF.
struct Script {
    lines: std::vec::IntoIter<String>,
}

impl Script {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|line| (*line).to_string())
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl LineEditor for Script {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.lines.next().map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, _line: &str) {}
}

#[test]
fn repl_session_with_directives() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("util.stitch"), "var factor = 3;").unwrap();

    let options = SessionOptions::default().with_base_directory(dir.path());
    let mut repl = Repl::with_editor(
        Script::new(&[
            "#r \"util.stitch\"",
            "using Math;",
            "var total = 0;",
            "while (total < 10) {",
            "  total += factor;",
            "}",
        ]),
        options,
    )
    .without_banner();
    repl.run().unwrap();

    assert!(repl.references().contains(&"util.stitch".to_string()));
    assert!(repl.usings().contains(&"Math".to_string()));
    let outcome = repl.eval("Max(total, 1)").unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(12)));
}

#[test]
fn errors_do_not_end_the_session() {
    let mut repl = Repl::with_editor(
        Script::new(&["var x = 2;", "x / 0", "int y = ", "x = x * 5;"]),
        SessionOptions::default(),
    )
    .without_banner();
    repl.run().unwrap();

    let outcome = repl.eval("x").unwrap();
    assert_eq!(outcome.return_value(), Some(&Value::Int(10)));
}
