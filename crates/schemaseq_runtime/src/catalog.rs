//! Catalog and executor seams, and creation ordering built on them.
//!
//! A [`Catalog`] stands in for schema introspection of a live database:
//! it lists objects, raw dependency edges, and source text. An
//! [`Executor`] runs statements. Neither is implemented against a real
//! database here; [`MemoryCatalog`] serves tests and the REPL.

use std::collections::BTreeMap;

use schemaseq_foundation::{DependencyEdge, ObjectKey, Result};
use schemaseq_sequencer::order;
use schemaseq_sql::{Directory, GrammarKind, ParserConfig, SqlParser, Statement};
use tracing::debug;

/// Source of objects and dependencies for an export.
pub trait Catalog {
    /// Lists the objects of interest.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn objects(&self) -> Result<Vec<ObjectKey>>;

    /// Lists raw dependency edges. Edges may mention objects outside
    /// [`Catalog::objects`].
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn dependencies(&self) -> Result<Vec<DependencyEdge>>;

    /// Returns the full creation text of an object, if the catalog has it.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn source(&self, key: &ObjectKey) -> Result<Option<String>>;
}

/// Runs statements against a target database.
pub trait Executor {
    /// Executes one statement, returning the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns an error if the target rejects the statement.
    fn execute(&mut self, statement: &Statement) -> Result<u64>;

    /// Switches the session to another user.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be made.
    fn connect(&mut self, user: &str, dsn: Option<&str>) -> Result<()> {
        let _ = (user, dsn);
        Ok(())
    }
}

/// A catalog held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    objects: BTreeMap<ObjectKey, Option<String>>,
    dependencies: Vec<DependencyEdge>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object without source text.
    #[must_use]
    pub fn with_object(mut self, key: ObjectKey) -> Self {
        self.objects.entry(key).or_insert(None);
        self
    }

    /// Adds an object with its creation text.
    #[must_use]
    pub fn with_source(mut self, key: ObjectKey, source: impl Into<String>) -> Self {
        self.objects.insert(key, Some(source.into()));
        self
    }

    /// Adds a raw dependency edge.
    #[must_use]
    pub fn with_dependency(mut self, from: ObjectKey, to: ObjectKey) -> Self {
        self.dependencies.push(DependencyEdge::new(from, to));
        self
    }

    /// Builds a catalog from parsed statements, keeping each creating
    /// statement's text and dependencies.
    #[must_use]
    pub fn from_statements<'a>(statements: impl IntoIterator<Item = &'a Statement>) -> Self {
        let mut catalog = Self::new();
        for statement in statements {
            let Some(key) = statement.key() else {
                continue;
            };
            for dependency in &statement.dependencies {
                catalog
                    .dependencies
                    .push(DependencyEdge::new(key.clone(), dependency.clone()));
            }
            catalog.objects.insert(key, Some(statement.to_script()));
        }
        catalog
    }
}

impl Catalog for MemoryCatalog {
    fn objects(&self) -> Result<Vec<ObjectKey>> {
        Ok(self.objects.keys().cloned().collect())
    }

    fn dependencies(&self) -> Result<Vec<DependencyEdge>> {
        Ok(self.dependencies.clone())
    }

    fn source(&self, key: &ObjectKey) -> Result<Option<String>> {
        Ok(self.objects.get(key).cloned().flatten())
    }
}

/// Orders every catalog object for creation.
///
/// # Errors
///
/// Returns catalog errors, or a cycle error from the sequencer.
pub fn export_order(catalog: &impl Catalog) -> Result<Vec<ObjectKey>> {
    let objects = catalog.objects()?;
    let dependencies = catalog.dependencies()?;
    debug!(
        objects = objects.len(),
        dependencies = dependencies.len(),
        "ordering catalog export"
    );
    order(objects, dependencies)
}

/// Derives dependency edges by parsing the source of each key with the
/// full grammar.
///
/// All sources share one session whose directory starts with every
/// catalog object, so references between them resolve. Each source is
/// parsed with its object's owner as the current owner.
///
/// # Errors
///
/// Returns catalog errors and the first parse or processing error.
pub fn source_dependencies(catalog: &impl Catalog, keys: &[ObjectKey]) -> Result<Vec<DependencyEdge>> {
    let directory: Directory = catalog.objects()?.into_iter().collect();
    let config = ParserConfig::default().with_grammar(GrammarKind::Full);
    let mut parser = SqlParser::new(config)?.with_directory(directory);

    let mut edges = Vec::new();
    for key in keys {
        let Some(source) = catalog.source(key)? else {
            continue;
        };
        parser.set_owner(Some(&key.owner));
        for statement in parser.parse(&source)? {
            edges.extend(
                statement
                    .dependencies
                    .into_iter()
                    .filter(|dependency| dependency != key)
                    .map(|dependency| DependencyEdge::new(key.clone(), dependency)),
            );
        }
    }
    Ok(edges)
}

/// Orders the objects created by `statements`.
///
/// Only creating statements with an owner take part. Statements read one
/// at a time should go through [`SqlParser::resolve_pending`] first, so
/// references to objects created later in the script count.
///
/// # Errors
///
/// Returns a cycle error from the sequencer.
pub fn order_statements(statements: &[Statement]) -> Result<Vec<ObjectKey>> {
    let keys: Vec<ObjectKey> = statements.iter().filter_map(Statement::key).collect();
    let edges: Vec<DependencyEdge> = statements
        .iter()
        .filter_map(|statement| Some((statement.key()?, &statement.dependencies)))
        .flat_map(|(key, dependencies)| {
            dependencies
                .iter()
                .map(move |dependency| DependencyEdge::new(key.clone(), dependency.clone()))
        })
        .collect();
    order(keys, edges)
}
