//! Error types for the schemaseq system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::object::{ObjectKey, ObjectKind};

/// The main error type for schemaseq operations.
#[derive(Debug, Error)]
#[error("{kind}{}", context_suffix(.context))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a parse failure at the given position.
    #[must_use]
    pub fn parse_failure(
        position: usize,
        line: u32,
        column: u32,
        remaining: impl Into<String>,
        expected: Vec<String>,
    ) -> Self {
        Self::new(ErrorKind::ParseFailure {
            position,
            line,
            column,
            remaining: remaining.into(),
            expected,
        })
    }

    /// Creates an unsupported construct error.
    #[must_use]
    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedConstruct {
            construct: construct.into(),
        })
    }

    /// Creates a missing prerequisite error.
    #[must_use]
    pub fn missing_prerequisite(prerequisite: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingPrerequisite {
            prerequisite: prerequisite.into(),
        })
    }

    /// Creates a cycle detected error listing every blocked key and its
    /// unresolved edges.
    #[must_use]
    pub fn cycle(remaining: Vec<(ObjectKey, Vec<ObjectKey>)>) -> Self {
        Self::new(ErrorKind::CycleDetected { remaining })
    }

    /// Creates a grammar definition error.
    #[must_use]
    pub fn grammar(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Grammar(message.into()))
    }

    /// Creates an unknown production error.
    #[must_use]
    pub fn unknown_production(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownProduction(name.into()))
    }

    /// Returns true if the caller may skip the offending statement and
    /// continue processing.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind, ErrorKind::UnsupportedConstruct { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The input could not be matched by the grammar.
    #[error("parsing failed at {line}:{column} (offset {position}){}", expected_suffix(.expected))]
    ParseFailure {
        /// Byte offset of the furthest failure.
        position: usize,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// Excerpt of the text remaining at the failure position.
        remaining: String,
        /// Terminals the grammar expected at the failure position.
        expected: Vec<String>,
    },

    /// A recognized construct that is not handled.
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct {
        /// Description of the construct.
        construct: String,
    },

    /// A statement requires another one that has not been seen.
    #[error("missing prerequisite: {prerequisite}")]
    MissingPrerequisite {
        /// Description of what is missing.
        prerequisite: String,
    },

    /// The dependency graph contains a cycle.
    #[error("circular reference detected among {} objects", .remaining.len())]
    CycleDetected {
        /// Every key that could not be emitted with its unresolved edges.
        remaining: Vec<(ObjectKey, Vec<ObjectKey>)>,
    },

    /// A grammar definition could not be compiled.
    #[error("invalid grammar: {0}")]
    Grammar(String),

    /// The requested start production does not exist.
    #[error("unknown production: {0}")]
    UnknownProduction(String),

    /// I/O failure in the runtime layer.
    #[error("I/O error: {0}")]
    Io(String),

    /// Snapshot encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

fn context_suffix(context: &Option<ErrorContext>) -> String {
    match context {
        Some(ctx) if ctx.name.is_some() || ctx.line.is_some() => format!(" {ctx}"),
        _ => String::new(),
    }
}

fn expected_suffix(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(", expected one of: {}", expected.join(", "))
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Owner of the object being processed.
    pub owner: Option<String>,
    /// Name of the object being processed.
    pub name: Option<String>,
    /// Kind of the object being processed.
    pub kind: Option<ObjectKind>,
    /// Line number in source (1-indexed).
    pub line: Option<u32>,
    /// Byte offset in source.
    pub offset: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the object owner and name.
    #[must_use]
    pub fn with_object(mut self, owner: Option<&str>, name: impl Into<String>) -> Self {
        self.owner = owner.map(str::to_string);
        self.name = Some(name.into());
        self
    }

    /// Sets the object kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_location(mut self, line: u32, offset: usize) -> Self {
        self.line = Some(line);
        self.offset = Some(offset);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if let Some(name) = &self.name {
            write!(f, "at ")?;
            if let Some(owner) = &self.owner {
                write!(f, "{owner}.")?;
            }
            write!(f, "{name}")?;
            if let Some(kind) = self.kind {
                write!(f, " ({kind})")?;
            }
            wrote = true;
        }
        if let Some(line) = self.line {
            if wrote {
                write!(f, ", ")?;
            }
            write!(f, "line {line}")?;
        }
        Ok(())
    }
}

/// Result type alias using the schemaseq error.
pub type Result<T> = std::result::Result<T, Error>;
