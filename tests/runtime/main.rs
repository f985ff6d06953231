//! Integration tests for Layer 4: Runtime
//!
//! Tests for script application, catalog export ordering, and sessions.

mod applier;
mod export;
mod session;
