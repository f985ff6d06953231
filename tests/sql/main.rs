//! Integration tests for Layer 2: SQL
//!
//! Tests for statement parsing, dependency resolution, and script rendering.

mod properties;
mod resolution;
mod scripts;
