//! Core types shared by every schemaseq layer.
//!
//! This crate provides:
//! - [`ObjectKey`] and [`ObjectKind`] - Identity of schema objects
//! - [`DependencyEdge`] - Raw "depends on" relations between objects
//! - [`Span`] - Source locations with line/column math
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod object;
pub mod span;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use object::{DependencyEdge, ObjectKey, ObjectKind};
pub use span::{Span, excerpt, line_column};
