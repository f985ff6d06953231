//! Tree processors: one parse tree node in, one typed [`Statement`] out.
//!
//! Both grammars name their statement rules the same way, so the handlers
//! for statements the grammars share live here. Each grammar has its own
//! processor for the rest: the structural one reads names off the tree,
//! the full one also walks bodies to collect references.

mod full;
mod structural;

use schemaseq_foundation::{Error, ErrorContext, ErrorKind, ObjectKey, ObjectKind, Result};
use schemaseq_grammar::{NodeId, ParseTree};
use tracing::debug;

use crate::config::{GrammarKind, ParserConfig};
use crate::directory::{Directory, PUBLIC_OWNER, SYSTEM_OWNER};
use crate::statement::{Statement, StatementDetail, StatementKind};

pub(crate) use full::FullProcessor;

/// Statement rules handled the same way under both grammars.
const SHARED_RULES: &[&str] = &[
    "create_other_statement",
    "alter_statement",
    "drop_statement",
    "truncate_statement",
    "rename_statement",
    "comment_statement",
    "commit_statement",
    "rollback_statement",
    "connect_statement",
    "grant_statement",
    "revoke_statement",
];

/// State carried from one statement to the next.
#[derive(Clone, Debug, Default)]
pub(crate) struct Session {
    /// Owner assumed for unqualified names.
    pub(crate) owner: Option<String>,
    /// Objects created so far.
    pub(crate) directory: Directory,
}

impl Session {
    /// Records the effects of a processed statement.
    pub(crate) fn accept(&mut self, statement: &Statement) {
        debug!(
            kind = %statement.kind,
            owner = statement.owner.as_deref().unwrap_or(""),
            name = statement.name.as_deref().unwrap_or(""),
            line = statement.line,
            dependencies = statement.dependencies.len(),
            "processed statement"
        );
        if let Some(key) = statement.key() {
            self.directory.register(key);
        }
        if let StatementDetail::Connect { user, .. } = &statement.detail {
            self.owner = Some(user.clone());
        }
    }
}

/// Turns statement nodes into statements.
pub(crate) enum Processor {
    Structural,
    Full(FullProcessor),
}

impl Processor {
    pub(crate) fn new(config: &ParserConfig) -> Self {
        match config.grammar {
            GrammarKind::Structural => Self::Structural,
            GrammarKind::Full => Self::Full(FullProcessor::new(&config.extra_system_identifiers)),
        }
    }

    /// Returns true if `rule` names a statement this processor understands.
    pub(crate) fn handles(&self, rule: &str) -> bool {
        SHARED_RULES.contains(&rule)
            || match self {
                Self::Structural => structural::RULES.contains(&rule),
                Self::Full(_) => full::RULES.contains(&rule),
            }
    }

    /// Processes one statement node.
    ///
    /// # Errors
    ///
    /// Returns an unsupported construct error for object kinds the
    /// processor does not know, and a missing prerequisite error for a
    /// package body whose header was never seen.
    pub(crate) fn process(
        &self,
        tree: &ParseTree<'_>,
        node: NodeId,
        session: &mut Session,
    ) -> Result<Statement> {
        let rule = tree.rule_name(node);
        if SHARED_RULES.contains(&rule) {
            return shared(tree, node, session);
        }
        match self {
            Self::Structural => structural::process(tree, node, session),
            Self::Full(processor) => processor.process(tree, node, session),
        }
    }
}

// =============================================================================
// Tree helpers
// =============================================================================

/// Returns true for identifier leaves.
pub(crate) fn is_identifier(tree: &ParseTree<'_>, node: NodeId) -> bool {
    matches!(
        tree.rule_name(node),
        "unquoted_identifier" | "quoted_identifier"
    )
}

/// Returns the normalized value of an identifier leaf: unquoted names are
/// uppercased, quoted names keep their case and lose the quotes.
pub(crate) fn identifier_value(tree: &ParseTree<'_>, node: NodeId) -> String {
    let text = tree.text(node);
    if tree.is(node, "quoted_identifier") {
        text.trim_matches('"').to_string()
    } else {
        text.to_ascii_uppercase()
    }
}

/// Returns the parts of a qualified identifier. `%TYPE` and `@link`
/// modifiers are dropped.
pub(crate) fn qualified_parts(tree: &ParseTree<'_>, node: NodeId) -> Vec<String> {
    if is_identifier(tree, node) {
        return vec![identifier_value(tree, node)];
    }
    tree.children(node)
        .iter()
        .filter(|&&child| is_identifier(tree, child))
        .map(|&child| identifier_value(tree, child))
        .collect()
}

/// Returns the first direct identifier child.
pub(crate) fn first_identifier(tree: &ParseTree<'_>, node: NodeId) -> Option<NodeId> {
    tree.find_child(node, |child| is_identifier(tree, child))
}

/// Returns the direct `qualified_identifier` children in order.
pub(crate) fn qualified_children(tree: &ParseTree<'_>, node: NodeId) -> Vec<NodeId> {
    tree.children_by_rule(node, "qualified_identifier")
}

/// Splits `OWNER.NAME` or `NAME` into an owner and a name.
pub(crate) fn split_owner(
    parts: &[String],
    default_owner: Option<&str>,
) -> Option<(Option<String>, String)> {
    match parts {
        [] => None,
        [name] => Some((default_owner.map(str::to_string), name.clone())),
        [owner, name, ..] => Some((Some(owner.clone()), name.clone())),
    }
}

/// Returns the owner unqualified objects of `kind` belong to.
pub(crate) fn owner_for(kind: ObjectKind, session_owner: Option<&str>) -> Option<String> {
    match kind {
        ObjectKind::Role | ObjectKind::User | ObjectKind::Context => Some(SYSTEM_OWNER.to_string()),
        ObjectKind::PublicSynonym => Some(PUBLIC_OWNER.to_string()),
        _ => session_owner.map(str::to_string),
    }
}

/// Reads the `object_type` child of alter, drop, and create statements.
pub(crate) fn object_kind_of(tree: &ParseTree<'_>, node: NodeId) -> Result<ObjectKind> {
    let Some(object_type) = tree.child_by_rule(node, "object_type") else {
        return Err(internal(tree, node, "statement without object type"));
    };
    ObjectKind::from_catalog_name(tree.text(object_type))
}

/// Creates the statement for `node` with no object attached.
pub(crate) fn statement(tree: &ParseTree<'_>, node: NodeId, kind: StatementKind) -> Statement {
    Statement::new(kind, tree.text(node), tree.span(node))
}

/// Creates a statement naming the object in `name_node`, which is either a
/// qualified identifier or a plain identifier.
pub(crate) fn object_statement(
    tree: &ParseTree<'_>,
    node: NodeId,
    kind: StatementKind,
    name_node: Option<NodeId>,
    session: &Session,
) -> Result<Statement> {
    let base = statement(tree, node, kind);
    let Some(name_node) = name_node else {
        return Err(internal(tree, node, "statement without object name"));
    };
    let parts = qualified_parts(tree, name_node);
    let default_owner = match kind.object_kind() {
        Some(object) => owner_for(object, session.owner.as_deref()),
        None => session.owner.clone(),
    };
    let Some((owner, name)) = split_owner(&parts, default_owner.as_deref()) else {
        return Err(internal(tree, node, "empty object name"));
    };
    Ok(base.with_object(owner, name))
}

/// Resolves `parts` in the directory, falling back to a key of
/// `fallback` kind owned by the first part or by `owner`.
pub(crate) fn resolve_or(
    directory: &Directory,
    parts: &[String],
    owner: Option<&str>,
    fallback: ObjectKind,
) -> Option<ObjectKey> {
    if let Some(key) = directory.resolve(parts, owner) {
        return Some(key.clone());
    }
    let (owner, name) = split_owner(parts, owner)?;
    owner.map(|owner| ObjectKey::new(owner, name, fallback))
}

fn internal(tree: &ParseTree<'_>, node: NodeId, message: &str) -> Error {
    let span = tree.span(node);
    Error::new(ErrorKind::Internal(format!("{message}: {}", tree.rule_name(node))))
        .with_context(ErrorContext::new().with_location(span.line, span.start))
}

// =============================================================================
// Shared statements
// =============================================================================

fn shared(tree: &ParseTree<'_>, node: NodeId, session: &Session) -> Result<Statement> {
    let rule = tree.rule_name(node);
    let name_node = qualified_children(tree, node).first().copied();
    match rule {
        "create_other_statement" => {
            let span = tree.span(node);
            let context = ErrorContext::new().with_location(span.line, span.start);
            let kind = object_kind_of(tree, node).map_err(|e| e.with_context(context.clone()))?;
            Err(Error::unsupported(format!("CREATE {kind}")).with_context(context.with_kind(kind)))
        }
        "alter_statement" => {
            let kind = object_kind_of(tree, node)?;
            object_statement(tree, node, StatementKind::Alter(kind), name_node, session)
        }
        "drop_statement" => {
            let kind = object_kind_of(tree, node)?;
            object_statement(tree, node, StatementKind::Drop(kind), name_node, session)
        }
        "truncate_statement" => {
            object_statement(tree, node, StatementKind::Truncate, name_node, session)
        }
        "rename_statement" => {
            let from = first_identifier(tree, node);
            object_statement(tree, node, StatementKind::Rename, from, session)
        }
        "comment_statement" => Ok(statement(tree, node, StatementKind::Comment)),
        "commit_statement" => Ok(statement(tree, node, StatementKind::Commit)),
        "rollback_statement" => Ok(statement(tree, node, StatementKind::Rollback)),
        "connect_statement" => connect(tree, node),
        "grant_statement" => grant(tree, node, StatementKind::Grant, "grant_clause", session),
        "revoke_statement" => grant(tree, node, StatementKind::Revoke, "revoke_clause", session),
        _ => Err(internal(tree, node, "no handler for statement")),
    }
}

fn connect(tree: &ParseTree<'_>, node: NodeId) -> Result<Statement> {
    let Some(user) = first_identifier(tree, node) else {
        return Err(internal(tree, node, "connect without user"));
    };
    let user = identifier_value(tree, user);
    let dsn = tree
        .child_by_rule(node, "connect_dsn")
        .map(|dsn| tree.text(dsn).to_string());
    Ok(statement(tree, node, StatementKind::Connect)
        .with_object(None, user.clone())
        .with_detail(StatementDetail::Connect { user, dsn }))
}

fn grant(
    tree: &ParseTree<'_>,
    node: NodeId,
    kind: StatementKind,
    clause_rule: &str,
    session: &Session,
) -> Result<Statement> {
    let base = statement(tree, node, kind);
    let Some(clause) = tree.child_by_rule(node, clause_rule) else {
        return Ok(base.with_detail(StatementDetail::Grant {
            privileges: Vec::new(),
            grantees: Vec::new(),
            object: None,
        }));
    };

    let privileges = tree
        .child_by_rule(clause, "privilege_list")
        .map(|list| {
            tree.children_by_rule(list, "privilege")
                .into_iter()
                .map(|p| {
                    tree.text(p)
                        .split_whitespace()
                        .map(str::to_ascii_uppercase)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        })
        .unwrap_or_default();
    let grantees = tree
        .child_by_rule(clause, "identifier_list")
        .map(|list| {
            tree.children(list)
                .iter()
                .filter(|&&id| is_identifier(tree, id))
                .map(|&id| identifier_value(tree, id))
                .collect()
        })
        .unwrap_or_default();

    let owner = session.owner.as_deref();
    let parts = tree
        .child_by_rule(clause, "qualified_identifier")
        .map(|object| qualified_parts(tree, object));
    let object = parts
        .as_deref()
        .and_then(|parts| split_owner(parts, owner))
        .and_then(|(owner, name)| owner.map(|owner| (owner, name)));
    let dependencies: Vec<ObjectKey> = parts
        .as_deref()
        .and_then(|parts| session.directory.resolve(parts, owner))
        .cloned()
        .into_iter()
        .collect();

    Ok(base
        .with_detail(StatementDetail::Grant {
            privileges,
            grantees,
            object,
        })
        .with_dependencies(dependencies))
}
