//! Session state shared by the CLI and the REPL.
//!
//! A session parses one input after another against a single directory, so
//! later inputs resolve references to objects created by earlier ones, and
//! remembers every statement for ordering.

use std::fmt::Write as _;

use schemaseq_foundation::{ObjectKey, Result};
use schemaseq_sql::{Directory, ParserConfig, SqlParser, Statement, StatementDetail};

use crate::catalog::order_statements;
use crate::snapshot::Snapshot;

const FILE_PRODUCTION: &str = "file";

/// Parsing state carried across inputs.
#[derive(Clone, Debug, Default)]
pub struct Session {
    config: ParserConfig,
    directory: Directory,
    statements: Vec<Statement>,
}

impl Session {
    /// Creates a session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with the given parser configuration.
    #[must_use]
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the parser configuration.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the owner assumed for unqualified names.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.config.owner.as_deref()
    }

    /// Sets the owner assumed for unqualified names.
    pub fn set_owner(&mut self, owner: Option<&str>) {
        self.config.owner = owner.map(str::to_ascii_uppercase);
    }

    /// Returns the objects known to the session.
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Returns every statement parsed so far.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Parses `source`, returning its statements.
    ///
    /// Statements parsed before an error stay registered in the session.
    /// References left pending by earlier inputs are retried against the
    /// objects this one creates.
    ///
    /// # Errors
    ///
    /// Returns the first parse or processing error.
    pub fn eval(&mut self, source: &str) -> Result<Vec<Statement>> {
        let mut parser =
            SqlParser::new(self.config.clone())?.with_directory(self.directory.clone());

        let mut parsed = Vec::new();
        let mut failure = None;
        if self.config.production == FILE_PRODUCTION {
            for statement in parser.statements(source) {
                match statement {
                    Ok(statement) => parsed.push(statement),
                    Err(err) => failure = Some(err),
                }
            }
        } else {
            match parser.parse(source) {
                Ok(statements) => parsed = statements,
                Err(err) => failure = Some(err),
            }
        }

        parser.resolve_pending(&mut parsed);
        parser.resolve_pending(&mut self.statements);
        self.config.owner = parser.owner().map(str::to_string);
        self.directory = parser.into_directory();
        self.statements.extend(parsed.iter().cloned());
        match failure {
            Some(err) => Err(err),
            None => Ok(parsed),
        }
    }

    /// Orders every object created in the session.
    ///
    /// # Errors
    ///
    /// Returns a cycle error from the sequencer.
    pub fn order(&self) -> Result<Vec<ObjectKey>> {
        order_statements(&self.statements)
    }

    /// Captures the persistent part of the session.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            owner: self.config.owner.clone(),
            directory: self.directory.clone(),
        }
    }

    /// Replaces the owner and directory with a snapshot's.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.config.owner = snapshot.owner;
        self.directory = snapshot.directory;
    }
}

/// Renders a statement with its dependencies, one per line.
#[must_use]
pub fn describe(statement: &Statement) -> String {
    let mut out = statement.to_string();
    match &statement.detail {
        StatementDetail::None => {}
        StatementDetail::Constraint { table, referenced } => {
            let _ = write!(out, " on {}.{}", table.0, table.1);
            if let Some((owner, name)) = referenced {
                let _ = write!(out, " references {owner}.{name}");
            }
        }
        StatementDetail::Index { table } | StatementDetail::Trigger { table } => {
            let _ = write!(out, " on {}.{}", table.0, table.1);
        }
        StatementDetail::Synonym { target } => {
            let _ = write!(out, " for {}.{}", target.0, target.1);
        }
        StatementDetail::Grant {
            privileges,
            grantees,
            object,
        } => {
            let _ = write!(out, " {}", privileges.join(", "));
            if let Some((owner, name)) = object {
                let _ = write!(out, " on {owner}.{name}");
            }
            let _ = write!(out, " to {}", grantees.join(", "));
        }
        StatementDetail::Connect { user, dsn } => {
            let _ = write!(out, " as {user}");
            if let Some(dsn) = dsn {
                let _ = write!(out, "@{dsn}");
            }
        }
    }
    for dependency in &statement.dependencies {
        let _ = write!(out, "\n  depends on {dependency}");
    }
    out
}
