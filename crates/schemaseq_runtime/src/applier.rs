//! Applying scripts statement by statement.
//!
//! The applier parses with the structural grammar, which only finds
//! statement boundaries and names, and hands each statement to an
//! [`Executor`] as soon as it is parsed. A failure part way through leaves
//! the earlier statements applied.

use schemaseq_foundation::{Error, Result};
use schemaseq_sql::{ErrorPolicy, ParserConfig, SqlParser, Statement, StatementDetail};
use tracing::{debug, warn};

use crate::catalog::Executor;

/// Counts from one script application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Statements handed to the executor successfully.
    pub executed: usize,
    /// Statements skipped under [`ErrorPolicy::SkipUnsupported`].
    pub skipped: usize,
    /// Rows reported by data manipulation statements.
    pub rows: u64,
}

/// Applies scripts through an [`Executor`].
#[derive(Clone, Debug)]
pub struct ScriptApplier {
    config: ParserConfig,
}

impl Default for ScriptApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptApplier {
    /// Creates an applier using the structural grammar and fail-fast policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ParserConfig::structural(),
        }
    }

    /// Builder method to set the initial owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.config = self.config.with_owner(owner);
        self
    }

    /// Builder method to set the error policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config = self.config.with_policy(policy);
        self
    }

    /// Returns the parser configuration.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses and executes `script` one statement at a time.
    ///
    /// `connect` statements are passed to [`Executor::connect`] and switch
    /// the owner for the statements after them.
    ///
    /// # Errors
    ///
    /// Returns the first parse error, and the first executor error the
    /// policy does not skip, annotated with the statement's location.
    pub fn apply(&self, script: &str, executor: &mut impl Executor) -> Result<ApplySummary> {
        let mut parser = SqlParser::new(self.config.clone())?;
        let mut statements = parser.statements(script);
        let mut summary = ApplySummary::default();

        for statement in statements.by_ref() {
            let statement = statement?;
            match self.run(&statement, executor) {
                Ok(rows) => {
                    summary.executed += 1;
                    summary.rows += rows;
                }
                Err(err) if self.skips(&err) => {
                    warn!(statement = %statement, error = %err, "skipping statement");
                    summary.skipped += 1;
                }
                Err(err) => return Err(err.with_context(statement.error_context())),
            }
        }

        summary.skipped += statements.skipped();
        debug!(
            executed = summary.executed,
            skipped = summary.skipped,
            rows = summary.rows,
            "applied script"
        );
        Ok(summary)
    }

    fn run(&self, statement: &Statement, executor: &mut impl Executor) -> Result<u64> {
        if let StatementDetail::Connect { user, dsn } = &statement.detail {
            executor.connect(user, dsn.as_deref())?;
            debug!(user = %user, "connected");
            return Ok(0);
        }
        let rows = executor.execute(statement)?;
        let message = statement
            .rows_message(rows)
            .or_else(|| statement.log_message())
            .unwrap_or_default();
        debug!(line = statement.line, "{message}");
        Ok(rows)
    }

    fn skips(&self, err: &Error) -> bool {
        self.config.policy == ErrorPolicy::SkipUnsupported && err.is_recoverable()
    }
}
