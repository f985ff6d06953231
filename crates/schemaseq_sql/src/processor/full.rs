//! Statements of the full grammar.
//!
//! Every statement that can refer to other objects is walked with an
//! [`Analyzer`], which keeps a [`ScopeStack`] in step with the declarations
//! it passes. Names that are not local when they are used become external
//! references; after the walk they are resolved against the session
//! directory and the ones that resolve become dependencies.

use schemaseq_foundation::{Error, ObjectKey, ObjectKind, Result};
use schemaseq_grammar::{NodeId, ParseTree};

use super::structural::{constraint_statement, on_table};
use super::{
    Session, first_identifier, internal, is_identifier, object_statement,
    qualified_children, qualified_parts, resolve_or, statement,
};
use crate::scope::{SYSTEM_IDENTIFIERS, ScopeStack};
use crate::statement::{PendingReference, Statement, StatementDetail, StatementKind};

/// Statement rules specific to the full grammar.
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
    "primary_key_constraint",
    "unique_constraint",
    "foreign_key_constraint",
    "check_constraint",
    "insert_statement",
    "update_statement",
    "delete_statement",
    "merge_statement",
    "standalone_select_statement",
    "anonymous_block",
];

/// Correlation names a trigger body can use without declaring them.
const TRIGGER_NAMES: &[&str] = &[":NEW", ":OLD", "NEW", "OLD", "PARENT"];

/// Processor for the full grammar.
pub(crate) struct FullProcessor {
    builtins: Vec<String>,
}

impl FullProcessor {
    pub(crate) fn new(extra: &[String]) -> Self {
        let builtins = SYSTEM_IDENTIFIERS
            .iter()
            .map(|name| (*name).to_string())
            .chain(extra.iter().map(|name| name.to_ascii_uppercase()))
            .collect();
        Self { builtins }
    }

    fn analyzer<'t, 'a>(&self, tree: &'t ParseTree<'a>) -> Analyzer<'t, 'a> {
        Analyzer {
            tree,
            scopes: ScopeStack::new(&self.builtins),
        }
    }

    pub(super) fn process(
        &self,
        tree: &ParseTree<'_>,
        node: NodeId,
        session: &mut Session,
    ) -> Result<Statement> {
        let qualified = qualified_children(tree, node);
        let name = qualified.first().copied();

        match tree.rule_name(node) {
            "create_table_statement" => self.unit(tree, node, ObjectKind::Table, session),
            "create_view_statement" => self.unit(tree, node, ObjectKind::View, session),
            "create_procedure_statement" => self.unit(tree, node, ObjectKind::Procedure, session),
            "create_function_statement" => self.unit(tree, node, ObjectKind::Function, session),
            "create_package_statement" => self.header(tree, node, ObjectKind::Package, session),
            "create_type_statement" => self.header(tree, node, ObjectKind::Type, session),
            "create_package_body_statement" => {
                self.body(tree, node, ObjectKind::PackageBody, session)
            }
            "create_type_body_statement" => self.body(tree, node, ObjectKind::TypeBody, session),
            "create_trigger_statement" => self.trigger(tree, node, session),
            "create_sequence_statement" => {
                object_statement(tree, node, create(ObjectKind::Sequence), name, session)
            }
            "create_role_statement" | "create_user_statement" | "create_context_statement" => {
                named_system_object(tree, node, session)
            }
            "create_synonym_statement" => synonym(tree, node, &qualified, session),
            "create_index_statement" => {
                let index = object_statement(tree, node, create(ObjectKind::Index), name, session)?;
                let table = qualified.get(1).copied();
                Ok(on_table(tree, index, table, session, |table| StatementDetail::Index { table }))
            }
            "primary_key_constraint" => constraint(tree, node, ObjectKind::PrimaryKey, session),
            "unique_constraint" => constraint(tree, node, ObjectKind::UniqueConstraint, session),
            "foreign_key_constraint" => constraint(tree, node, ObjectKind::ForeignKey, session),
            "check_constraint" => constraint(tree, node, ObjectKind::CheckConstraint, session),
            "insert_statement" => self.dml(tree, node, StatementKind::Insert, name, session),
            "update_statement" => self.dml(tree, node, StatementKind::Update, name, session),
            "delete_statement" => self.dml(tree, node, StatementKind::Delete, name, session),
            "merge_statement" => {
                let target = tree
                    .child_by_rule(node, "merge_header")
                    .and_then(|header| qualified_children(tree, header).first().copied());
                self.dml(tree, node, StatementKind::Merge, target, session)
            }
            "standalone_select_statement" => {
                let mut analyzer = self.analyzer(tree);
                analyzer.visit(node);
                let (dependencies, pending) = analyzer.resolve(session, session.owner.as_deref());
                Ok(statement(tree, node, StatementKind::Select)
                    .with_dependencies(dependencies)
                    .with_pending(pending))
            }
            "anonymous_block" => {
                let mut analyzer = self.analyzer(tree);
                analyzer.scopes.push();
                analyzer.visit_children(node);
                let (dependencies, pending) = analyzer.resolve(session, session.owner.as_deref());
                Ok(statement(tree, node, StatementKind::AnonymousBlock)
                    .with_dependencies(dependencies)
                    .with_pending(pending))
            }
            _ => Err(internal(tree, node, "no handler for statement")),
        }
    }

    /// Walks a named object and returns it with its resolved references.
    fn unit(
        &self,
        tree: &ParseTree<'_>,
        node: NodeId,
        kind: ObjectKind,
        session: &Session,
    ) -> Result<Statement> {
        let (statement, _) = self.walk_named(tree, node, kind, session, &[], None)?;
        Ok(statement)
    }

    /// Walks a package or type header and leaves its top-level names in the
    /// directory for the body.
    fn header(
        &self,
        tree: &ParseTree<'_>,
        node: NodeId,
        kind: ObjectKind,
        session: &mut Session,
    ) -> Result<Statement> {
        let (statement, locals) = self.walk_named(tree, node, kind, session, &[], None)?;
        if let Some(name) = &statement.name {
            let owner = statement.owner.as_deref().unwrap_or_default();
            session.directory.store_identifiers(owner, name, locals);
        }
        Ok(statement)
    }

    /// Walks a package or type body with its header's names in scope.
    ///
    /// A package body with no header in the session is an error; a type
    /// body without its type is accepted.
    fn body(
        &self,
        tree: &ParseTree<'_>,
        node: NodeId,
        kind: ObjectKind,
        session: &Session,
    ) -> Result<Statement> {
        let header_kind = if kind == ObjectKind::PackageBody {
            ObjectKind::Package
        } else {
            ObjectKind::Type
        };
        let name_node = qualified_children(tree, node).first().copied();
        let named = object_statement(tree, node, create(kind), name_node, session)?;
        let name = named.name.clone().unwrap_or_default();
        let owner = named.owner.clone();

        let seeded = session
            .directory
            .identifiers(owner.as_deref().unwrap_or_default(), &name)
            .map(<[Vec<String>]>::to_vec);
        let header_known = owner
            .as_deref()
            .and_then(|owner| session.directory.get(owner, &name))
            .is_some_and(|key| key.kind == header_kind);
        if seeded.is_none() && !header_known && header_kind == ObjectKind::Package {
            let qualified = named.qualified_name().unwrap_or_default();
            return Err(Error::missing_prerequisite(format!("package header {qualified}"))
                .with_context(named.error_context()));
        }

        let header = owner
            .as_ref()
            .map(|owner| ObjectKey::new(owner.clone(), name.clone(), header_kind));
        let seeded = seeded.unwrap_or_default();
        let (statement, _) = self.walk_named(tree, node, kind, session, &seeded, header)?;
        Ok(statement)
    }

    fn trigger(&self, tree: &ParseTree<'_>, node: NodeId, session: &Session) -> Result<Statement> {
        let seeds: Vec<Vec<String>> = TRIGGER_NAMES
            .iter()
            .map(|name| vec![(*name).to_string()])
            .collect();
        let (trigger, _) =
            self.walk_named(tree, node, ObjectKind::Trigger, session, &seeds, None)?;
        let body = trigger.dependencies.clone();
        let table = qualified_children(tree, node).get(1).copied();
        let trigger = on_table(tree, trigger, table, session, |table| {
            StatementDetail::Trigger { table }
        });
        let dependencies: Vec<ObjectKey> =
            trigger.dependencies.iter().cloned().chain(body).collect();
        Ok(trigger.with_dependencies(dependencies))
    }

    /// Walks an object-creating statement whose first qualified identifier
    /// child is its name. Every other qualified identifier child is a
    /// reference, except for triggers whose second one is the table.
    ///
    /// Returns the statement and the names its outermost scope declared.
    fn walk_named(
        &self,
        tree: &ParseTree<'_>,
        node: NodeId,
        kind: ObjectKind,
        session: &Session,
        seeds: &[Vec<String>],
        header: Option<ObjectKey>,
    ) -> Result<(Statement, Vec<Vec<String>>)> {
        let qualified = qualified_children(tree, node);
        let name_node = qualified.first().copied();
        let named = object_statement(tree, node, create(kind), name_node, session)?;
        let skip: Vec<NodeId> = if kind == ObjectKind::Trigger {
            qualified.iter().take(2).copied().collect()
        } else {
            name_node.into_iter().collect()
        };

        let mut analyzer = self.analyzer(tree);
        analyzer.scopes.push();
        for seed in seeds {
            analyzer.scopes.add_qualified(seed.clone());
        }
        if let Some(name) = &named.name {
            analyzer.scopes.add_identifier(name);
            if let Some(owner) = &named.owner {
                analyzer.scopes.add_qualified(vec![owner.clone(), name.clone()]);
            }
        }
        for &child in tree.children(node) {
            if !skip.contains(&child) {
                analyzer.visit(child);
            }
        }

        let locals = analyzer.scopes.local_identifiers();
        let owner = named.owner.clone().or_else(|| session.owner.clone());
        let (references, pending) = analyzer.resolve(session, owner.as_deref());
        let dependencies: Vec<ObjectKey> = header.into_iter().chain(references).collect();
        Ok((named.with_dependencies(dependencies).with_pending(pending), locals))
    }

    fn dml(
        &self,
        tree: &ParseTree<'_>,
        node: NodeId,
        kind: StatementKind,
        target: Option<NodeId>,
        session: &Session,
    ) -> Result<Statement> {
        let statement = object_statement(tree, node, kind, target, session)?;
        let mut analyzer = self.analyzer(tree);
        analyzer.visit(node);
        let (dependencies, pending) = analyzer.resolve(session, session.owner.as_deref());
        Ok(statement.with_dependencies(dependencies).with_pending(pending))
    }
}

const fn create(kind: ObjectKind) -> StatementKind {
    StatementKind::Create(kind)
}

fn named_system_object(tree: &ParseTree<'_>, node: NodeId, session: &Session) -> Result<Statement> {
    let kind = match tree.rule_name(node) {
        "create_role_statement" => ObjectKind::Role,
        "create_user_statement" => ObjectKind::User,
        _ => ObjectKind::Context,
    };
    let object = object_statement(tree, node, create(kind), first_identifier(tree, node), session)?;
    if kind != ObjectKind::Context {
        return Ok(object);
    }
    let package = qualified_children(tree, node).first().and_then(|&package| {
        resolve_or(
            &session.directory,
            &qualified_parts(tree, package),
            session.owner.as_deref(),
            ObjectKind::Package,
        )
    });
    Ok(object.with_dependencies(package))
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
    let synonym = object_statement(tree, node, create(kind), qualified.first().copied(), session)?;
    let target = qualified
        .get(1)
        .map(|&target| qualified_parts(tree, target))
        .and_then(|parts| super::split_owner(&parts, session.owner.as_deref()))
        .and_then(|(owner, name)| owner.map(|owner| (owner, name)));
    Ok(match target {
        Some(target) => synonym.with_detail(StatementDetail::Synonym { target }),
        None => synonym,
    })
}

fn constraint(
    tree: &ParseTree<'_>,
    node: NodeId,
    kind: ObjectKind,
    session: &Session,
) -> Result<Statement> {
    let common = tree.child_by_rule(node, "constraint_common_clause");
    let table = common.and_then(|common| qualified_children(tree, common).first().copied());
    let name = common.and_then(|common| first_identifier(tree, common));
    let referenced = qualified_children(tree, node).first().copied();
    constraint_statement(tree, node, kind, table, name, referenced, session)
}

// =============================================================================
// Analyzer
// =============================================================================

/// Walks a statement tree, tracking declarations and collecting references.
struct Analyzer<'t, 'a> {
    tree: &'t ParseTree<'a>,
    scopes: ScopeStack,
}

impl Analyzer<'_, '_> {
    fn visit_children(&mut self, node: NodeId) {
        let tree = self.tree;
        for &child in tree.children(node) {
            self.visit(child);
        }
    }

    fn visit_children_except(&mut self, node: NodeId, skip: &[NodeId]) {
        let tree = self.tree;
        for &child in tree.children(node) {
            if !skip.contains(&child) {
                self.visit(child);
            }
        }
    }

    /// Declares the first identifier child of `node`.
    fn declare_first(&mut self, node: NodeId) -> Option<NodeId> {
        let name = first_identifier(self.tree, node)?;
        self.scopes.add_qualified(qualified_parts(self.tree, name));
        Some(name)
    }

    /// Records the first qualified identifier child of `node` as a reference.
    fn reference_first(&mut self, node: NodeId, ignore_unqualified: bool) -> Option<NodeId> {
        let target = qualified_children(self.tree, node).first().copied()?;
        self.scopes
            .add_reference(qualified_parts(self.tree, target), ignore_unqualified);
        Some(target)
    }

    /// Visits `node` in a scope that is closed afterwards.
    fn scoped(&mut self, node: NodeId, body: impl FnOnce(&mut Self, NodeId)) {
        let depth = self.scopes.depth();
        self.scopes.push();
        body(self, node);
        self.scopes.truncate(depth);
    }

    fn visit(&mut self, node: NodeId) {
        let tree = self.tree;
        match tree.rule_name(node) {
            "argument" | "simple_declaration" | "exception_declaration" | "array_declaration"
            | "ref_cursor_declaration" | "column_clause" => {
                let name = first_identifier(tree, node);
                self.visit_children_except(node, &name.into_iter().collect::<Vec<_>>());
                self.declare_first(node);
            }
            "record_declaration" => {
                self.declare_first(node);
                self.scoped(node, Self::visit_children);
            }
            "subtype_declaration" => {
                self.declare_first(node);
                self.reference_first(node, false);
            }
            "common_definition" => {
                let name = self.declare_first(node);
                self.scopes.push();
                self.visit_children_except(node, &name.into_iter().collect::<Vec<_>>());
            }
            "procedure_declaration" | "function_declaration" | "cursor_definition"
            | "method_spec" | "compound_statement" => {
                let depth = self.scopes.depth();
                self.visit_children(node);
                self.scopes.truncate(depth);
            }
            "data_type" | "return_clause" | "procedure_call" | "raise_statement"
            | "merge_error_logging_clause" => {
                let target = self.reference_first(node, false);
                self.visit_children_except(node, &target.into_iter().collect::<Vec<_>>());
            }
            "references_clause" => {
                self.reference_first(node, false);
            }
            "function_expression" => {
                let name = qualified_children(tree, node).first().copied();
                self.visit_children_except(node, &name.into_iter().collect::<Vec<_>>());
                if let Some(name) = name {
                    self.scopes.add_reference(qualified_parts(tree, name), false);
                }
            }
            "prior_expression" => {
                self.reference_first(node, true);
            }
            "from_clause" => {
                for &child in tree.children(node) {
                    if tree.is(child, "qualified_identifier") {
                        self.scopes.add_reference(qualified_parts(tree, child), false);
                    } else if is_identifier(tree, child) {
                        self.scopes.add_identifier(&super::identifier_value(tree, child));
                    } else {
                        self.visit(child);
                    }
                }
            }
            "insert_statement" | "update_statement" | "delete_statement" => {
                self.scoped(node, Self::visit_target_and_aliases);
            }
            "merge_statement" => self.scoped(node, |this, node| {
                if let Some(header) = this.tree.child_by_rule(node, "merge_header") {
                    this.visit_target_and_aliases(header);
                }
                let header: Vec<NodeId> =
                    this.tree.child_by_rule(node, "merge_header").into_iter().collect();
                this.visit_children_except(node, &header);
            }),
            "select_statement" | "select_into_statement" => self.scoped(node, Self::visit_select),
            "common_table" => {
                let name = self.declare_first(node);
                self.visit_children_except(node, &name.into_iter().collect::<Vec<_>>());
            }
            "for_clause" | "forall_statement" => {
                let name = self.declare_first(node);
                self.visit_children_except(node, &name.into_iter().collect::<Vec<_>>());
            }
            "referencing_clause" => {
                for &child in tree.children(node) {
                    if is_identifier(tree, child) {
                        self.scopes.add_identifier(&super::identifier_value(tree, child));
                    }
                }
            }
            _ => self.visit_children(node),
        }
    }

    /// Visits a statement whose qualified identifiers are tables and whose
    /// plain identifiers are their aliases.
    fn visit_target_and_aliases(&mut self, node: NodeId) {
        let tree = self.tree;
        let mut rest = Vec::new();
        for &child in tree.children(node) {
            if tree.is(child, "qualified_identifier") {
                self.scopes.add_reference(qualified_parts(tree, child), false);
            } else if is_identifier(tree, child) {
                self.scopes.add_identifier(&super::identifier_value(tree, child));
            } else {
                rest.push(child);
            }
        }
        for child in rest {
            self.visit(child);
        }
    }

    /// Visits a query: common tables first, then the FROM lists so their
    /// aliases are known, then everything else.
    fn visit_select(&mut self, node: NodeId) {
        let tree = self.tree;
        let children = tree.children(node);
        let first: Vec<NodeId> = children
            .iter()
            .copied()
            .filter(|&child| tree.is(child, "with_clause"))
            .chain(
                children
                    .iter()
                    .copied()
                    .filter(|&child| tree.is(child, "from_clause_list")),
            )
            .collect();
        for &child in &first {
            self.visit(child);
        }
        self.visit_children_except(node, &first);
    }

    /// Resolves the collected references against the session directory.
    ///
    /// References that do not resolve yet are returned as pending, so they
    /// can be retried once later statements have been registered.
    fn resolve(
        &self,
        session: &Session,
        owner: Option<&str>,
    ) -> (Vec<ObjectKey>, Vec<PendingReference>) {
        let mut dependencies = Vec::new();
        let mut pending = Vec::new();
        for parts in self.scopes.references() {
            match session.directory.resolve(&parts, owner) {
                Some(key) => dependencies.push(key.clone()),
                None => pending.push(PendingReference::new(parts, owner)),
            }
        }
        (dependencies, pending)
    }
}
