//! End-to-end tests for Layer 3: Runtime
//!
//! Runs script files and scripted REPL sessions against real files.

mod repl;
mod scripts;
