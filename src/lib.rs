//! Stitch - Incremental script sessions
//!
//! This crate re-exports all layers of the Stitch system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: stitch_runtime    - REPL, CLI, script runner, logging setup
//! Layer 2: stitch_session    - Session coordinator, engine configuration, hosts, packs
//! Layer 1: stitch_language   - Lexer, parser, binder, interpreter, native modules
//! Layer 0: stitch_foundation - Core types (Value, Error, ReferenceSet, ExecutionOutcome)
//! ```

pub use stitch_foundation as foundation;
pub use stitch_language as language;
pub use stitch_runtime as runtime;
pub use stitch_session as session;
