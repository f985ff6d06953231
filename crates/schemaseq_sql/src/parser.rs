//! The SQL parser front end.
//!
//! [`SqlParser`] owns a compiled grammar, the tree processor for it, and
//! the session state threaded from one statement to the next: the current
//! owner and the directory of objects created so far.
//!
//! Scripts can be parsed whole with [`SqlParser::parse`] or one statement
//! at a time with [`SqlParser::statements`], which stops at the first
//! statement that fails.

use std::iter::FusedIterator;
use std::sync::Arc;

use schemaseq_foundation::{Error, Result};
use schemaseq_grammar::{Grammar, Matcher, RuleId};
use tracing::{debug, warn};

use crate::config::{ErrorPolicy, GrammarKind, ParserConfig};
use crate::directory::Directory;
use crate::grammars;
use crate::processor::{Processor, Session};
use crate::statement::Statement;

const SEPARATOR_RULE: &str = "separator";
const STATEMENT_RULE: &str = "sql_statement";
const FILE_RULE: &str = "file";

/// Parses SQL scripts into dependency-annotated statements.
pub struct SqlParser {
    config: ParserConfig,
    grammar: Arc<Grammar>,
    processor: Processor,
    session: Session,
    separator: RuleId,
    statement: RuleId,
}

impl SqlParser {
    /// Creates a parser for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a grammar error if the grammar does not compile, and an
    /// unknown production error if the configured production is missing.
    pub fn new(config: ParserConfig) -> Result<Self> {
        let grammar = grammars::grammar(config.grammar)?;
        let rule = |name: &str| grammar.rule_id(name).ok_or_else(|| Error::unknown_production(name));
        let separator = rule(SEPARATOR_RULE)?;
        let statement = rule(STATEMENT_RULE)?;
        rule(&config.production)?;

        let processor = Processor::new(&config);
        let session = Session {
            owner: config.owner.clone(),
            directory: Directory::new(),
        };
        Ok(Self {
            config,
            grammar,
            processor,
            session,
            separator,
            statement,
        })
    }

    /// Seeds the parser with objects known before the script starts.
    #[must_use]
    pub fn with_directory(mut self, directory: Directory) -> Self {
        self.session.directory = directory;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the compiled grammar.
    #[must_use]
    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Returns the objects created so far.
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.session.directory
    }

    /// Consumes the parser, returning its directory.
    #[must_use]
    pub fn into_directory(self) -> Directory {
        self.session.directory
    }

    /// Returns the owner assumed for unqualified names.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.session.owner.as_deref()
    }

    /// Sets the owner assumed for unqualified names.
    pub fn set_owner(&mut self, owner: Option<&str>) {
        self.session.owner = owner.map(str::to_ascii_uppercase);
    }

    /// Returns a lazy iterator over the statements of `source`.
    ///
    /// The iterator yields at most one error and then ends. Under
    /// [`ErrorPolicy::SkipUnsupported`], recoverable errors are logged and
    /// the statement is skipped instead.
    pub fn statements<'a>(&'a mut self, source: &'a str) -> Statements<'a> {
        Statements {
            parser: self,
            source,
            position: 0,
            skipped: 0,
            done: false,
        }
    }

    /// Parses `source` with the configured start production.
    ///
    /// References to objects created later in `source` are resolved once
    /// the whole of it has been parsed.
    ///
    /// # Errors
    ///
    /// Returns the first parse or processing error that the error policy
    /// does not skip.
    pub fn parse(&mut self, source: &str) -> Result<Vec<Statement>> {
        let mut statements = if self.config.production == FILE_RULE {
            self.statements(source).collect::<Result<Vec<_>>>()?
        } else {
            self.parse_production(source)?
        };
        self.resolve_pending(&mut statements);
        Ok(statements)
    }

    /// Retries the pending references of `statements` against the
    /// directory as it stands now.
    ///
    /// Statements taken from [`SqlParser::statements`] resolve only against
    /// objects created before them; call this once the script is done.
    pub fn resolve_pending(&self, statements: &mut [Statement]) {
        for statement in statements {
            let added = statement.resolve_pending(&self.session.directory);
            if added > 0 {
                debug!(statement = %statement, added, "resolved forward references");
            }
        }
    }

    fn parse_production(&mut self, source: &str) -> Result<Vec<Statement>> {
        let grammar = Arc::clone(&self.grammar);
        let start = Matcher::new(&grammar, source)
            .match_rule(self.separator, 0)?
            .map_or(0, |separator| separator.end);
        let text = source.trim_end();
        let tree = grammar.parse_at(&self.config.production, text, start.min(text.len()))?;
        let mut statements = Vec::new();
        for &root in tree.roots() {
            if !self.processor.handles(tree.rule_name(root)) {
                continue;
            }
            match self.processor.process(&tree, root, &mut self.session) {
                Ok(statement) => {
                    self.session.accept(&statement);
                    statements.push(statement);
                }
                Err(err) if self.skips(&err) => log_skipped(&err),
                Err(err) => return Err(err),
            }
        }
        Ok(statements)
    }

    fn skips(&self, err: &Error) -> bool {
        self.config.policy == ErrorPolicy::SkipUnsupported && err.is_recoverable()
    }
}

impl std::fmt::Debug for SqlParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlParser")
            .field("config", &self.config)
            .field("owner", &self.session.owner)
            .field("objects", &self.session.directory.len())
            .finish_non_exhaustive()
    }
}

fn log_skipped(err: &Error) {
    warn!(error = %err, "skipping statement");
}

/// Lazy iterator over the statements of one script.
///
/// Created by [`SqlParser::statements`].
pub struct Statements<'a> {
    parser: &'a mut SqlParser,
    source: &'a str,
    position: usize,
    skipped: usize,
    done: bool,
}

impl Statements<'_> {
    /// Returns the byte offset where the next statement starts.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns how many statements the error policy skipped so far.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn step(&mut self) -> Result<Option<Statement>> {
        let grammar = Arc::clone(&self.parser.grammar);
        let mut matcher = Matcher::new(&grammar, self.source);

        if let Some(separator) = matcher.match_rule(self.parser.separator, self.position)? {
            self.position = separator.end;
        }
        if self.position >= self.source.len() {
            return Ok(None);
        }

        let Some(matched) = matcher.match_rule(self.parser.statement, self.position)? else {
            return Err(matcher.failure_error());
        };
        self.position = matched.end;

        let tree = matched.tree;
        let parser = &mut *self.parser;
        let Some(root) = tree
            .roots()
            .iter()
            .copied()
            .find(|&root| parser.processor.handles(tree.rule_name(root)))
        else {
            return Err(matcher.failure_error());
        };
        let statement = parser.processor.process(&tree, root, &mut parser.session)?;
        parser.session.accept(&statement);
        Ok(Some(statement))
    }
}

impl Iterator for Statements<'_> {
    type Item = Result<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.step() {
                Ok(Some(statement)) => return Some(Ok(statement)),
                Ok(None) => self.done = true,
                Err(err) if self.parser.skips(&err) => {
                    log_skipped(&err);
                    self.skipped += 1;
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

impl FusedIterator for Statements<'_> {}

/// Parses a script in one call.
///
/// `production` names the start rule; `"file"` parses a whole script.
///
/// # Errors
///
/// Returns the first parse or processing error, or an unknown production
/// error if `production` is not a rule of the grammar.
pub fn parse(
    source: &str,
    grammar: GrammarKind,
    production: &str,
    owner: Option<&str>,
) -> Result<Vec<Statement>> {
    let mut config = ParserConfig::default()
        .with_grammar(grammar)
        .with_production(production);
    if let Some(owner) = owner {
        config = config.with_owner(owner);
    }
    SqlParser::new(config)?.parse(source)
}
