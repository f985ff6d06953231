//! Statements of the structural grammar.
//!
//! Bodies are opaque here, so dependencies come only from names the
//! statement header spells out: an index's table, a trigger's table, a
//! constraint's tables, a body's header.

use schemaseq_foundation::{ObjectKey, ObjectKind, Result};
use schemaseq_grammar::{NodeId, ParseTree};

use super::{
    Session, first_identifier, internal, object_statement, qualified_children, qualified_parts,
    resolve_or, split_owner, statement,
};
use crate::statement::{Statement, StatementDetail, StatementKind};

/// Statement rules specific to the structural grammar.
pub(super) const RULES: &[&str] = &[
    "create_table_statement",
    "create_view_statement",
    "create_index_statement",
    "create_sequence_statement",
    "create_synonym_statement",
    "create_role_statement",
    "create_user_statement",
    "create_context_statement",
    "create_package_body_statement",
    "create_package_statement",
    "create_type_body_statement",
    "create_type_statement",
    "create_trigger_statement",
    "create_procedure_statement",
    "create_function_statement",
    "add_constraint_statement",
    "insert_statement",
    "update_statement",
    "delete_statement",
    "merge_statement",
    "query_statement",
    "anonymous_block",
];

pub(super) fn process(tree: &ParseTree<'_>, node: NodeId, session: &Session) -> Result<Statement> {
    let qualified = qualified_children(tree, node);
    let name = qualified.first().copied();
    let create = |kind| object_statement(tree, node, StatementKind::Create(kind), name, session);

    match tree.rule_name(node) {
        "create_table_statement" => create(ObjectKind::Table),
        "create_view_statement" => create(ObjectKind::View),
        "create_sequence_statement" => create(ObjectKind::Sequence),
        "create_procedure_statement" => create(ObjectKind::Procedure),
        "create_function_statement" => create(ObjectKind::Function),
        "create_package_statement" => create(ObjectKind::Package),
        "create_type_statement" => create(ObjectKind::Type),
        "create_package_body_statement" => {
            let body = create(ObjectKind::PackageBody)?;
            let header = header_key(&body, ObjectKind::Package);
            Ok(body.with_dependencies(header))
        }
        "create_type_body_statement" => {
            let body = create(ObjectKind::TypeBody)?;
            let header = header_key(&body, ObjectKind::Type);
            Ok(body.with_dependencies(header))
        }
        "create_synonym_statement" => synonym(tree, node, &qualified, session),
        "create_role_statement" | "create_user_statement" => {
            let kind = if tree.is(node, "create_role_statement") {
                ObjectKind::Role
            } else {
                ObjectKind::User
            };
            object_statement(
                tree,
                node,
                StatementKind::Create(kind),
                first_identifier(tree, node),
                session,
            )
        }
        "create_context_statement" => {
            let context = object_statement(
                tree,
                node,
                StatementKind::Create(ObjectKind::Context),
                first_identifier(tree, node),
                session,
            )?;
            let package = name.and_then(|package| {
                let parts = qualified_parts(tree, package);
                resolve_or(
                    &session.directory,
                    &parts,
                    session.owner.as_deref(),
                    ObjectKind::Package,
                )
            });
            Ok(context.with_dependencies(package))
        }
        "create_index_statement" => {
            let index = create(ObjectKind::Index)?;
            let table = qualified.get(1).copied();
            Ok(on_table(tree, index, table, session, |table| StatementDetail::Index { table }))
        }
        "create_trigger_statement" => {
            let trigger = create(ObjectKind::Trigger)?;
            let table = qualified.get(1).copied();
            Ok(on_table(tree, trigger, table, session, |table| StatementDetail::Trigger { table }))
        }
        "add_constraint_statement" => constraint(tree, node, &qualified, session),
        "insert_statement" => dml(tree, node, StatementKind::Insert, name, session),
        "update_statement" => dml(tree, node, StatementKind::Update, name, session),
        "delete_statement" => dml(tree, node, StatementKind::Delete, name, session),
        "merge_statement" => dml(tree, node, StatementKind::Merge, name, session),
        "query_statement" => Ok(statement(tree, node, StatementKind::Select)),
        "anonymous_block" => Ok(statement(tree, node, StatementKind::AnonymousBlock)),
        _ => Err(internal(tree, node, "no handler for statement")),
    }
}

/// Returns the header a body belongs to, when the body has an owner.
fn header_key(body: &Statement, kind: ObjectKind) -> Option<ObjectKey> {
    Some(ObjectKey::new(body.owner.clone()?, body.name.clone()?, kind))
}

fn synonym(
    tree: &ParseTree<'_>,
    node: NodeId,
    qualified: &[NodeId],
    session: &Session,
) -> Result<Statement> {
    let kind = if tree.child_by_rule(node, "kw_public").is_some() {
        ObjectKind::PublicSynonym
    } else {
        ObjectKind::Synonym
    };
    let synonym = object_statement(
        tree,
        node,
        StatementKind::Create(kind),
        qualified.first().copied(),
        session,
    )?;
    let target = qualified
        .get(1)
        .map(|&target| qualified_parts(tree, target))
        .and_then(|parts| split_owner(&parts, session.owner.as_deref()))
        .and_then(|(owner, name)| owner.map(|owner| (owner, name)));
    Ok(match target {
        Some(target) => synonym.with_detail(StatementDetail::Synonym { target }),
        None => synonym,
    })
}

/// Attaches the table a statement is defined on as detail and dependency.
/// The table owner defaults to the statement's own owner.
pub(super) fn on_table(
    tree: &ParseTree<'_>,
    statement: Statement,
    table: Option<NodeId>,
    session: &Session,
    detail: impl FnOnce((String, String)) -> StatementDetail,
) -> Statement {
    let Some(table) = table else {
        return statement;
    };
    let parts = qualified_parts(tree, table);
    let owner = statement.owner.clone().or_else(|| session.owner.clone());
    let Some(key) = resolve_or(&session.directory, &parts, owner.as_deref(), ObjectKind::Table)
    else {
        return statement;
    };
    let table = (key.owner.clone(), key.name.clone());
    statement.with_detail(detail(table)).with_dependencies([key])
}

fn constraint(
    tree: &ParseTree<'_>,
    node: NodeId,
    qualified: &[NodeId],
    session: &Session,
) -> Result<Statement> {
    let clause = tree
        .children(node)
        .iter()
        .copied()
        .find(|&child| tree.rule_name(child).ends_with("_clause"));
    let kind = match clause.map(|clause| tree.rule_name(clause)) {
        Some("foreign_key_clause") => ObjectKind::ForeignKey,
        Some("primary_key_clause") => ObjectKind::PrimaryKey,
        Some("unique_clause") => ObjectKind::UniqueConstraint,
        Some("check_clause") => ObjectKind::CheckConstraint,
        _ => return Err(internal(tree, node, "constraint without kind")),
    };
    let referenced = clause.and_then(|clause| tree.child_by_rule(clause, "qualified_identifier"));
    constraint_statement(
        tree,
        node,
        kind,
        qualified.first().copied(),
        first_identifier(tree, node),
        referenced,
        session,
    )
}

/// Builds a constraint statement owned by its table's owner and depending
/// on the table and, for foreign keys, the referenced table.
pub(super) fn constraint_statement(
    tree: &ParseTree<'_>,
    node: NodeId,
    kind: ObjectKind,
    table: Option<NodeId>,
    name: Option<NodeId>,
    referenced: Option<NodeId>,
    session: &Session,
) -> Result<Statement> {
    let owner = session.owner.as_deref();
    let Some(table) = table.and_then(|table| {
        resolve_or(&session.directory, &qualified_parts(tree, table), owner, ObjectKind::Table)
    }) else {
        return Err(internal(tree, node, "constraint table without owner"));
    };
    let Some(name) = name
        .map(|name| qualified_parts(tree, name))
        .and_then(|parts| parts.into_iter().next())
    else {
        return Err(internal(tree, node, "constraint without name"));
    };
    let referenced = referenced.and_then(|referenced| {
        resolve_or(
            &session.directory,
            &qualified_parts(tree, referenced),
            Some(&table.owner),
            ObjectKind::Table,
        )
    });

    let detail = StatementDetail::Constraint {
        table: (table.owner.clone(), table.name.clone()),
        referenced: referenced.as_ref().map(|key| (key.owner.clone(), key.name.clone())),
    };
    let dependencies: Vec<ObjectKey> = std::iter::once(table.clone()).chain(referenced).collect();
    Ok(statement(tree, node, StatementKind::Create(kind))
        .with_object(Some(table.owner), name)
        .with_detail(detail)
        .with_dependencies(dependencies))
}

fn dml(
    tree: &ParseTree<'_>,
    node: NodeId,
    kind: StatementKind,
    target: Option<NodeId>,
    session: &Session,
) -> Result<Statement> {
    let statement = object_statement(tree, node, kind, target, session)?;
    let dependencies = target
        .map(|target| qualified_parts(tree, target))
        .and_then(|parts| session.directory.resolve(&parts, session.owner.as_deref()).cloned());
    Ok(statement.with_dependencies(dependencies))
}
