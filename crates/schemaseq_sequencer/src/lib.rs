//! Creation ordering for schema objects.
//!
//! This crate provides:
//! - [`DependencyGraph`] - Adjacency among keys of interest, with raw edges
//!   reduced through objects outside the set
//! - [`order`] - Topological ordering grouped by owner, with cycle detection
//!
//! # Example
//!
//! ```
//! use schemaseq_foundation::{ObjectKey, ObjectKind};
//! use schemaseq_sequencer::order;
//!
//! let a = ObjectKey::new("S", "A", ObjectKind::View);
//! let b = ObjectKey::new("S", "B", ObjectKind::View);
//! let c = ObjectKey::new("S", "C", ObjectKind::Table);
//! let ordered = order(
//!     [a.clone(), b.clone(), c.clone()],
//!     [(a.clone(), b.clone()), (b.clone(), c.clone())],
//! )
//! .unwrap();
//! assert_eq!(ordered, vec![c, b, a]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod graph;
pub mod order;

pub use graph::DependencyGraph;
pub use order::{order, order_graph};
