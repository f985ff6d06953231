//! Integration tests for Layer 3: Sequencer
//!
//! Tests for dependency graphs and owner-grouped ordering.

mod ordering;
mod properties;
