//! Integration tests for Layer 2: Session
//!
//! Tests the coordinator's first-call and continuation paths against a
//! recording engine, and the Stitch engine end to end.

mod baselines;
mod concurrency;
mod coordinator;
mod engine;
mod support;
