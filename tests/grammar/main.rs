//! Integration tests for Layer 1: Grammar
//!
//! Tests for grammar compilation, matching, and parse tree navigation.

mod compile;
mod parsing;
