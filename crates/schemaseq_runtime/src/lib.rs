//! Script application, catalog ordering, REPL, and CLI for schemaseq.
//!
//! This crate provides:
//! - [`ScriptApplier`] - Runs a script statement by statement against an [`Executor`]
//! - [`Catalog`] and [`export_order`] - Creation order for objects already in a database
//! - [`Session`] - Parsing state shared across inputs
//! - [`Repl`] - Interactive read-eval-print loop
//! - [`snapshot`] - Session persistence in `MessagePack`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod applier;
pub mod catalog;
pub mod editor;
pub mod highlight;
pub mod repl;
pub mod session;
pub mod snapshot;

pub use applier::{ApplySummary, ScriptApplier};
pub use catalog::{
    Catalog, Executor, MemoryCatalog, export_order, order_statements, source_dependencies,
};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::Repl;
pub use session::{Session, describe};
pub use snapshot::Snapshot;
