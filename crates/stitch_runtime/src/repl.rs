//! The interactive REPL.
//!
//! Each input is one chunk of a single growing session. Lines starting with
//! `:` are REPL commands; `#r` and `using` lines are directives that register
//! references and imports without running code.

use std::io::{self, Write};

use stitch_foundation::{Error, ExecutionOutcome, Result};
use stitch_session::{
    ExecutionRequest, ScriptEngine, ScriptPackSession, SessionCoordinator, SessionOptions,
};

use crate::directive::parse_directive;
use crate::editor::{LineEditor, ReadResult, RustylineEditor, is_complete};

/// Builds the pack session a REPL starts (and restarts) with.
pub type SessionFactory = Box<dyn Fn() -> ScriptPackSession>;

/// What the REPL should do after handling one input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading.
    Continue,
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Runs chunks against the session.
    coordinator: SessionCoordinator<ScriptEngine>,

    /// The current session.
    session: ScriptPackSession,

    /// Creates a fresh session on `:reset`.
    session_factory: SessionFactory,

    /// Script arguments handed to every chunk.
    args: Vec<String>,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(options: SessionOptions) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, options))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E, options: SessionOptions) -> Self {
        Self {
            editor,
            coordinator: SessionCoordinator::new(ScriptEngine, options),
            session: ScriptPackSession::empty(),
            session_factory: Box::new(ScriptPackSession::empty),
            args: Vec::new(),
            show_banner: true,
            prompt: "stitch> ".to_string(),
            continuation_prompt: "   ...> ".to_string(),
        }
    }

    /// Sets how sessions are created, and starts one.
    #[must_use]
    pub fn with_session_factory(mut self, factory: SessionFactory) -> Self {
        self.session = factory();
        self.session_factory = factory;
        self
    }

    /// Continues an existing session.
    #[must_use]
    pub fn with_session(mut self, session: ScriptPackSession) -> Self {
        self.session = session;
        self
    }

    /// Sets the script arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns the current session.
    #[must_use]
    pub const fn session(&self) -> &ScriptPackSession {
        &self.session
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    fn read_eval_print(&mut self) -> Result<Flow> {
        let Some(input) = self.read_input()? else {
            return Ok(Flow::Quit);
        };

        if input.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        self.editor.add_history(&input);

        let trimmed = input.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            return Ok(self.command(command.trim()));
        }

        let outcome = self.eval(&input)?;
        print_outcome(&outcome);
        Ok(Flow::Continue)
    }

    /// Reads a potentially multi-line input.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let prompt = if first_line {
                &self.prompt
            } else {
                &self.continuation_prompt
            };

            match self.editor.read_line(prompt)? {
                ReadResult::Line(line) => {
                    if first_line {
                        input = line;
                    } else {
                        input.push('\n');
                        input.push_str(&line);
                    }

                    if is_complete(&input) {
                        return Ok(Some(input));
                    }

                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::internal("unexpected EOF in multi-line input"));
                }
            }
        }
    }

    /// Evaluates one input: a directive or a chunk of code.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed directive or a terminated session.
    pub fn eval(&mut self, input: &str) -> Result<ExecutionOutcome> {
        let request = match parse_directive(input)? {
            Some(directive) => directive.apply(ExecutionRequest::new("")),
            None => ExecutionRequest::new(input),
        };
        let request = request.with_args(self.args.iter().cloned());
        self.coordinator.execute(request, &mut self.session)
    }

    /// Handles a `:command`.
    pub fn command(&mut self, command: &str) -> Flow {
        match command {
            "q" | "quit" | "exit" => return Flow::Quit,
            "h" | "help" => print_help(),
            "reset" => {
                self.session.terminate();
                self.session = (self.session_factory)();
                println!("Session reset.");
            }
            "refs" => {
                for line in self.references() {
                    println!("  {line}");
                }
            }
            "usings" => {
                for namespace in self.usings() {
                    println!("  {namespace}");
                }
            }
            other => print_error(&Error::invalid_argument(format!(
                "unknown command ':{other}' (try :help)"
            ))),
        }
        Flow::Continue
    }

    /// Lists the references registered in the current session.
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        let Some(record) = self.coordinator.record(&self.session) else {
            return Vec::new();
        };
        let references = record.configuration.references();
        references
            .paths()
            .map(|path| path.display().to_string())
            .chain(references.modules().map(|module| module.name().to_string()))
            .collect()
    }

    /// Lists the namespaces imported in the current session.
    #[must_use]
    pub fn usings(&self) -> Vec<String> {
        self.coordinator
            .record(&self.session)
            .map(|record| {
                record
                    .configuration
                    .namespaces()
                    .iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mStitch\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Type code to run it, :help for commands, Ctrl+D to exit.\n");
        let _ = io::stdout().flush();
    }
}

/// Prints an outcome the way the REPL shows it.
pub fn print_outcome(outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::Success(Some(value)) => println!("\x1b[1m{}\x1b[0m", value.repr()),
        ExecutionOutcome::Success(None) | ExecutionOutcome::Empty => {}
        ExecutionOutcome::CompilationError(diagnostics) => {
            for diagnostic in diagnostics.iter() {
                eprintln!("\x1b[31m{diagnostic}\x1b[0m");
            }
        }
        ExecutionOutcome::ExecutionError(error) => print_error(error),
    }
}

fn print_error(error: &Error) {
    match &error.context {
        Some(context) => eprintln!("\x1b[31mError: {error} ({context})\x1b[0m"),
        None => eprintln!("\x1b[31mError: {error}\x1b[0m"),
    }
}

fn print_help() {
    println!(
        "\x1b[1mREPL COMMANDS:\x1b[0m
    #r \"path\"      Reference a library script (or stitch.core / stitch.math)
    using Ns;      Import a namespace
    :refs          List registered references
    :usings        List imported namespaces
    :reset         End the session and start a new one
    :help          Show this help
    :quit          Exit (or Ctrl+D)"
    );
}
