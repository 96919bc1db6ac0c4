//! Integration tests for Layer 1: Language
//!
//! Runs whole chunks through parse, bind, and interpret.

mod linking;
mod programs;
