//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Error, reference and namespace sets, and
//! execution outcomes.

mod errors;
mod outcomes;
