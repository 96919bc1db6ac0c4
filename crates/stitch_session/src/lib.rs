//! Incremental script sessions for Stitch.
//!
//! This crate provides:
//! - [`SessionCoordinator`] - Runs successive chunks as one growing program
//! - [`EngineConfiguration`] - Versioned snapshot of registered inputs
//! - [`ExecutionEngine`] - The interface an engine implements, with
//!   [`ScriptEngine`] as the Stitch language implementation
//! - [`ScriptHost`] and [`ScriptHostFactory`] - Per-call host objects
//! - [`ScriptPackSession`] - Packs plus the typed per-session [`StateStore`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod configuration;
pub mod coordinator;
pub mod engine;
pub mod host;
pub mod options;
pub mod pack;
pub mod record;
pub mod script_engine;

pub use configuration::EngineConfiguration;
pub use coordinator::{ExecutionRequest, SessionCoordinator, outcome_from_error};
pub use engine::{Continuation, ExecutionEngine, Globals};
pub use host::{DefaultHostFactory, HOST_MODULE, HOST_NAMESPACE, ScriptHost, ScriptHostFactory};
pub use options::SessionOptions;
pub use pack::{
    PackContextRef, PackInitializer, ScriptPack, ScriptPackContext, ScriptPackSession, StateStore,
};
pub use record::SessionRecord;
pub use script_engine::{ScriptEngine, ScriptState};
