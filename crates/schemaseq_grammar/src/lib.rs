//! Declarative PEG grammars and the matching engine for schemaseq.
//!
//! This crate provides:
//! - [`Grammar`] - Rules compiled once from a small text notation
//! - [`Matcher`] - Ordered-choice backtracking with commit markers and
//!   furthest-failure tracking
//! - [`ParseTree`] - Arena-allocated match results with navigation helpers
//!
//! # Example
//!
//! ```
//! use schemaseq_grammar::Grammar;
//!
//! let grammar = Grammar::compile(r"
//!     list = word (',' word)* ;
//!     word = [a-z]+ ;
//! ").unwrap();
//! let tree = grammar.parse("list", "ab,cd").unwrap();
//! let root = tree.root().unwrap();
//! assert_eq!(tree.children(root).len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod grammar;
mod notation;
pub mod rule;
pub mod tree;

pub use engine::{Failure, Match, Matcher};
pub use grammar::Grammar;
pub use rule::{CharClass, Expr, Rule, RuleId, RuleMode};
pub use tree::{Node, NodeId, ParseTree};
