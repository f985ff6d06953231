//! Configuration for SQL parsing sessions.

use std::fmt;
use std::str::FromStr;

use schemaseq_foundation::{Error, Result};

/// Which grammar a parser uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GrammarKind {
    /// Statement boundaries and object names only; bodies are opaque.
    Structural,
    /// Expressions, queries, and PL/SQL bodies are parsed so that every
    /// referenced object can be found.
    #[default]
    Full,
}

impl GrammarKind {
    /// Returns the lowercase name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GrammarKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "structural" | "simple" => Ok(Self::Structural),
            "full" => Ok(Self::Full),
            other => Err(Error::unsupported(format!("grammar {other}"))),
        }
    }
}

/// What a parsing session does with recoverable failures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorPolicy {
    /// Every error ends the session.
    #[default]
    FailFast,
    /// Statements that are recognized but unsupported are logged and
    /// skipped; every other error still ends the session.
    SkipUnsupported,
}

/// Configuration for a [`SqlParser`](crate::SqlParser).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Grammar to parse with.
    pub grammar: GrammarKind,

    /// Start production. `"file"` parses a sequence of statements.
    pub production: String,

    /// Owner assumed for unqualified names.
    pub owner: Option<String>,

    /// Handling of unsupported statements.
    pub policy: ErrorPolicy,

    /// Identifiers to treat as built-ins in addition to the default set.
    pub extra_system_identifiers: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            grammar: GrammarKind::default(),
            production: "file".to_string(),
            owner: None,
            policy: ErrorPolicy::default(),
            extra_system_identifiers: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Creates a configuration for applying scripts statement by statement.
    #[must_use]
    pub fn structural() -> Self {
        Self {
            grammar: GrammarKind::Structural,
            ..Self::default()
        }
    }

    /// Builder method to set the grammar.
    #[must_use]
    pub fn with_grammar(mut self, grammar: GrammarKind) -> Self {
        self.grammar = grammar;
        self
    }

    /// Builder method to set the start production.
    #[must_use]
    pub fn with_production(mut self, production: impl Into<String>) -> Self {
        self.production = production.into();
        self
    }

    /// Builder method to set the owner hint. The name is upper-cased.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into().to_ascii_uppercase());
        self
    }

    /// Builder method to set the error policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder method to add a built-in identifier.
    #[must_use]
    pub fn with_system_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.extra_system_identifiers
            .push(identifier.into().to_ascii_uppercase());
        self
    }
}
