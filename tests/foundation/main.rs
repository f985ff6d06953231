//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: ObjectKey, ObjectKind, Span, and Error.

mod errors;
mod objects;
mod spans;
