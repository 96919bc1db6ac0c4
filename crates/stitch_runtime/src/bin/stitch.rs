//! Stitch CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use stitch_foundation::{ExecutionOutcome, Reference};
use stitch_runtime::directive::resolve_reference;
use stitch_runtime::{Repl, ScriptRunner, logging, print_outcome};
use stitch_session::{ScriptEngine, ScriptPackSession, SessionCoordinator, SessionOptions};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    file: Option<PathBuf>,
    script_args: Vec<String>,
    references: Vec<String>,
    usings: Vec<String>,
    base_dir: Option<PathBuf>,
    log_level: Option<String>,
    repl_after_file: bool,
    show_help: bool,
    show_version: bool,
}

impl CliConfig {
    fn session_options(&self) -> SessionOptions {
        let base_dir = self
            .base_dir
            .clone()
            .or_else(|| {
                self.file
                    .as_ref()
                    .and_then(|f| f.parent())
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(PathBuf::from)
            });

        let mut options = SessionOptions::default();
        if let Some(dir) = base_dir {
            options = options.with_base_directory(dir);
        }
        for target in &self.references {
            options = match resolve_reference(target) {
                Reference::Module(module) => options.with_module(module),
                Reference::Path(path) => options.with_path(path),
            };
        }
        for namespace in &self.usings {
            options = options.with_namespace(namespace.clone());
        }
        options
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn value_for(args: &[String], i: usize, flag: &str) -> Result<String, Box<dyn std::error::Error>> {
    args.get(i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value").into())
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-i" | "--repl" => config.repl_after_file = true,
            "-r" | "--reference" => {
                i += 1;
                config.references.push(value_for(&args, i, "--reference")?);
            }
            "-u" | "--using" => {
                i += 1;
                config.usings.push(value_for(&args, i, "--using")?);
            }
            "--base-dir" => {
                i += 1;
                config.base_dir = Some(PathBuf::from(value_for(&args, i, "--base-dir")?));
            }
            "--log-level" => {
                i += 1;
                config.log_level = Some(value_for(&args, i, "--log-level")?);
            }
            "--" => {
                config.script_args = args[i + 1..].to_vec();
                break;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path if config.file.is_none() => config.file = Some(PathBuf::from(path)),
            extra => config.script_args.push(extra.to_string()),
        }
        i += 1;
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if config.show_version {
        println!("stitch {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    logging::init(config.log_level.as_deref())?;
    let options = config.session_options();

    let Some(file) = &config.file else {
        Repl::new(options)?
            .with_args(config.script_args.clone())
            .run()?;
        return Ok(ExitCode::SUCCESS);
    };

    let coordinator = SessionCoordinator::new(ScriptEngine, options.clone());
    let mut session = ScriptPackSession::empty();
    let outcome = ScriptRunner::new(&coordinator)
        .with_args(config.script_args.clone())
        .run_file(file, &mut session)?;
    print_outcome(&outcome);

    if config.repl_after_file {
        Repl::new(options)?
            .with_session(session)
            .with_args(config.script_args)
            .without_banner()
            .run()?;
        return Ok(ExitCode::SUCCESS);
    }

    Ok(match outcome {
        ExecutionOutcome::CompilationError(_) | ExecutionOutcome::ExecutionError(_) => {
            ExitCode::FAILURE
        }
        ExecutionOutcome::Success(_) | ExecutionOutcome::Empty => ExitCode::SUCCESS,
    })
}

fn print_help() {
    println!(
        "\x1b[1mStitch\x1b[0m - Incremental script sessions

\x1b[1mUSAGE:\x1b[0m
    stitch [OPTIONS] [FILE] [-- SCRIPT_ARGS...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILE]             Script to run; starts the REPL if omitted
    [SCRIPT_ARGS...]   Arguments exposed to scripts as Args

\x1b[1mOPTIONS:\x1b[0m
    -h, --help             Print help information
    -V, --version          Print version information
    -r, --reference PATH   Reference a library script or built-in module
    -u, --using NAMESPACE  Import a namespace
        --base-dir DIR     Resolve library paths against DIR
        --log-level LEVEL  Log filter (overrides STITCH_LOG)
    -i, --repl             Start the REPL after running FILE

\x1b[1mEXAMPLES:\x1b[0m
    stitch                          Start interactive REPL
    stitch main.stitch              Run main.stitch
    stitch -u Math calc.stitch      Run with Math imported
    stitch -i setup.stitch          Run setup.stitch, then start REPL
    stitch job.stitch -- a b        Run with Args = [\"a\", \"b\"]

\x1b[1mREPL COMMANDS:\x1b[0m
    #r \"path\"      Reference a library script
    using Ns;      Import a namespace
    :refs :usings  Show registered inputs
    :reset         Start a new session
    Ctrl+D         Exit REPL
    Ctrl+C         Cancel current input"
    );
}
