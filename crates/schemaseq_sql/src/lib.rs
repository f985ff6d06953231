//! SQL and PL/SQL parsing with dependency resolution for schemaseq.
//!
//! This crate turns DDL scripts into typed [`Statement`]s, each carrying
//! the schema objects it depends on.
//!
//! # Architecture
//!
//! ```text
//! "create view v as select * from emp;"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ GRAMMAR         │  → structural (headers only) or full (bodies too)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ PARSE TREE      │  → create_view_statement(qualified_identifier, select_statement)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SCOPE           │  → free identifiers: [EMP]
//! │ ANALYSIS        │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ DIRECTORY       │  → SCOTT.EMP (Table)
//! │ RESOLUTION      │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ STATEMENT       │  → Create(View) SCOTT.V depends on [SCOTT.EMP]
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Grammar choice, start production, owner hint, error policy
//! - [`grammars`] - Grammar sources and the compiled-grammar cache
//! - [`parser`] - The parser front end and its lazy statement iterator
//! - [`scope`] - Lexical scopes for free-identifier analysis
//! - [`directory`] - Objects created so far, for resolving references
//! - [`statement`] - Typed statements and their script rendering

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod directory;
pub mod grammars;
pub mod parser;
mod processor;
pub mod scope;
pub mod statement;

// Re-export main types for convenience
pub use config::{ErrorPolicy, GrammarKind, ParserConfig};
pub use directory::{Directory, PUBLIC_OWNER, SYSTEM_OWNER};
pub use parser::{SqlParser, Statements, parse};
pub use scope::{SYSTEM_IDENTIFIERS, ScopeStack};
pub use statement::{PendingReference, Statement, StatementDetail, StatementKind};
