//! schemaseq - SQL/PL-SQL dependency analysis and creation ordering
//!
//! This crate re-exports all layers of the schemaseq system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: schemaseq_runtime    Script application, catalog export, REPL, CLI
//! Layer 3: schemaseq_sequencer  Owner-grouped topological ordering
//! Layer 2: schemaseq_sql        SQL grammars, tree processors, dependency resolution
//! Layer 1: schemaseq_grammar    PEG grammar compiler and backtracking matcher
//! Layer 0: schemaseq_foundation Core types (ObjectKey, Error, spans)
//! ```

pub use schemaseq_foundation as foundation;
pub use schemaseq_grammar as grammar;
pub use schemaseq_runtime as runtime;
pub use schemaseq_sequencer as sequencer;
pub use schemaseq_sql as sql;
