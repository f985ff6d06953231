//! Typed statements produced by the tree processors.

use std::fmt;

use schemaseq_foundation::{ErrorContext, ObjectKey, ObjectKind, Span};

use crate::directory::Directory;

/// What a statement does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementKind {
    /// `create [or replace] <kind> ...`, including `alter table ... add constraint`.
    Create(ObjectKind),
    /// `alter <kind> ...`
    Alter(ObjectKind),
    /// `drop <kind> ...`
    Drop(ObjectKind),
    /// `truncate table ...`
    Truncate,
    /// `rename a to b`
    Rename,
    /// `insert into ...`
    Insert,
    /// `update ...`
    Update,
    /// `delete [from] ...`
    Delete,
    /// `merge into ...`
    Merge,
    /// A standalone query.
    Select,
    /// `grant ...`
    Grant,
    /// `revoke ...`
    Revoke,
    /// `comment on ...`
    Comment,
    /// `commit`
    Commit,
    /// `rollback`
    Rollback,
    /// `connect user[/password][@dsn]`
    Connect,
    /// `declare ... begin ... end;` or `begin ... end;`
    AnonymousBlock,
}

impl StatementKind {
    /// Returns the kind of object this statement creates, alters, or drops.
    #[must_use]
    pub const fn object_kind(self) -> Option<ObjectKind> {
        match self {
            Self::Create(kind) | Self::Alter(kind) | Self::Drop(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns true if the statement is terminated by a `/` line in scripts.
    #[must_use]
    pub const fn is_unit(self) -> bool {
        match self {
            Self::Create(kind) => kind.is_plsql_unit(),
            Self::AnonymousBlock => true,
            _ => false,
        }
    }

    /// Returns true for insert, update, delete, and merge.
    #[must_use]
    pub const fn is_dml(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete | Self::Merge)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(kind) => write!(f, "CREATE {kind}"),
            Self::Alter(kind) => write!(f, "ALTER {kind}"),
            Self::Drop(kind) => write!(f, "DROP {kind}"),
            Self::Truncate => f.write_str("TRUNCATE"),
            Self::Rename => f.write_str("RENAME"),
            Self::Insert => f.write_str("INSERT"),
            Self::Update => f.write_str("UPDATE"),
            Self::Delete => f.write_str("DELETE"),
            Self::Merge => f.write_str("MERGE"),
            Self::Select => f.write_str("SELECT"),
            Self::Grant => f.write_str("GRANT"),
            Self::Revoke => f.write_str("REVOKE"),
            Self::Comment => f.write_str("COMMENT"),
            Self::Commit => f.write_str("COMMIT"),
            Self::Rollback => f.write_str("ROLLBACK"),
            Self::Connect => f.write_str("CONNECT"),
            Self::AnonymousBlock => f.write_str("ANONYMOUS BLOCK"),
        }
    }
}

/// Extra information carried by some statement kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementDetail {
    /// Nothing beyond the common fields.
    #[default]
    None,
    /// A table constraint.
    Constraint {
        /// The constrained table, as (owner, name).
        table: (String, String),
        /// For foreign keys, the referenced table.
        referenced: Option<(String, String)>,
    },
    /// An index.
    Index {
        /// The indexed table, as (owner, name).
        table: (String, String),
    },
    /// A synonym and what it stands for.
    Synonym {
        /// The target object, as (owner, name).
        target: (String, String),
    },
    /// A grant or revoke.
    Grant {
        /// Privileges with whitespace normalized, e.g. `SELECT`, `CREATE ANY TABLE`.
        privileges: Vec<String>,
        /// Users and roles receiving or losing the privileges.
        grantees: Vec<String>,
        /// The object the privileges apply to, for object grants.
        object: Option<(String, String)>,
    },
    /// A SQL*Plus style connect.
    Connect {
        /// The user connected as; becomes the session owner.
        user: String,
        /// The connect string after `@`, if any.
        dsn: Option<String>,
    },
    /// A trigger.
    Trigger {
        /// The table the trigger fires on, as (owner, name).
        table: (String, String),
    },
}

/// A reference that did not resolve when its statement was processed.
///
/// The object it names may be created later in the same session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingReference {
    /// Upper-cased name parts, as written.
    pub parts: Vec<String>,
    /// Owner that unqualified names resolve against.
    pub owner: Option<String>,
}

impl PendingReference {
    /// Creates a pending reference.
    #[must_use]
    pub fn new(parts: Vec<String>, owner: Option<&str>) -> Self {
        Self {
            parts,
            owner: owner.map(str::to_string),
        }
    }
}

/// One processed top-level statement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    /// What the statement does.
    pub kind: StatementKind,
    /// Owner of the affected object, if there is one.
    pub owner: Option<String>,
    /// Name of the affected object, if there is one.
    pub name: Option<String>,
    /// Executable text. Simple statements drop their `;`; PL/SQL units keep
    /// `END;` but drop the `/` line.
    pub sql: String,
    /// Line the statement starts on (1-indexed).
    pub line: u32,
    /// Source range of the statement, including its terminator.
    pub span: Span,
    /// Resolved objects this statement depends on. Never contains the
    /// statement's own key.
    pub dependencies: Vec<ObjectKey>,
    /// Kind-specific extras.
    pub detail: StatementDetail,
    /// References not found in the directory yet.
    pub pending: Vec<PendingReference>,
}

impl Statement {
    /// Creates a statement from the text it was parsed from.
    ///
    /// `text` is the full matched range including terminators; the
    /// executable form is derived from it.
    #[must_use]
    pub fn new(kind: StatementKind, text: &str, span: Span) -> Self {
        Self {
            kind,
            owner: None,
            name: None,
            sql: executable_text(text),
            line: span.line,
            span,
            dependencies: Vec::new(),
            detail: StatementDetail::None,
            pending: Vec::new(),
        }
    }

    /// Sets the owner and name.
    #[must_use]
    pub fn with_object(mut self, owner: Option<String>, name: impl Into<String>) -> Self {
        self.owner = owner;
        self.name = Some(name.into());
        self
    }

    /// Sets the detail.
    #[must_use]
    pub fn with_detail(mut self, detail: StatementDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Sets the dependencies, dropping duplicates and self-references while
    /// keeping first-seen order.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = ObjectKey>) -> Self {
        let own = self.key();
        let mut out: Vec<ObjectKey> = Vec::new();
        for dependency in dependencies {
            if own.as_ref() == Some(&dependency) || out.contains(&dependency) {
                continue;
            }
            out.push(dependency);
        }
        self.dependencies = out;
        self
    }

    /// Sets the references still waiting to resolve.
    #[must_use]
    pub fn with_pending(mut self, pending: Vec<PendingReference>) -> Self {
        self.pending = pending;
        self
    }

    /// Retries pending references against `directory`.
    ///
    /// References that now resolve are appended to the dependencies, except
    /// ones naming the statement's own object or an existing dependency.
    /// The rest stay pending. Returns the number of dependencies added.
    pub fn resolve_pending(&mut self, directory: &Directory) -> usize {
        let own = self.key();
        let mut added = 0;
        let mut unresolved = Vec::new();
        for reference in std::mem::take(&mut self.pending) {
            let Some(key) = directory.resolve(&reference.parts, reference.owner.as_deref()) else {
                unresolved.push(reference);
                continue;
            };
            if own.as_ref() != Some(key) && !self.dependencies.contains(key) {
                self.dependencies.push(key.clone());
                added += 1;
            }
        }
        self.pending = unresolved;
        added
    }

    /// Returns the key of the object this statement creates.
    ///
    /// Only creating statements with both an owner and a name have a key.
    #[must_use]
    pub fn key(&self) -> Option<ObjectKey> {
        match (self.kind, &self.owner, &self.name) {
            (StatementKind::Create(kind), Some(owner), Some(name)) => {
                Some(ObjectKey::new(owner.clone(), name.clone(), kind))
            }
            _ => None,
        }
    }

    /// Re-renders the statement as script text with its terminator.
    #[must_use]
    pub fn to_script(&self) -> String {
        if self.kind.is_unit() {
            format!("{}\n/", self.sql)
        } else {
            format!("{};", self.sql)
        }
    }

    /// Returns the message logged after the statement succeeds.
    ///
    /// Data manipulation statements report row counts through
    /// [`Statement::rows_message`] instead and return `None` here.
    #[must_use]
    pub fn log_message(&self) -> Option<String> {
        let object = || self.qualified_name().unwrap_or_default();
        match self.kind {
            StatementKind::Create(kind) => Some(format!("{} {} created.", kind.capitalized(), object())),
            StatementKind::Alter(kind) => Some(format!("{} {} altered.", kind.capitalized(), object())),
            StatementKind::Drop(kind) => Some(format!("{} {} dropped.", kind.capitalized(), object())),
            StatementKind::Truncate => Some(format!("Table {} truncated.", object())),
            StatementKind::Rename => Some(format!("Object {} renamed.", object())),
            StatementKind::Grant => Some("Privileges granted.".to_string()),
            StatementKind::Revoke => Some("Privileges revoked.".to_string()),
            StatementKind::Comment => Some("Comment created.".to_string()),
            StatementKind::Commit => Some("Commit point reached.".to_string()),
            StatementKind::Rollback => Some("Rolled back.".to_string()),
            StatementKind::Connect => Some(format!("Connected to {}.", object())),
            StatementKind::AnonymousBlock => Some("PL/SQL procedure successfully completed.".to_string()),
            StatementKind::Insert
            | StatementKind::Update
            | StatementKind::Delete
            | StatementKind::Merge
            | StatementKind::Select => None,
        }
    }

    /// Returns the row-count message for data manipulation statements.
    #[must_use]
    pub fn rows_message(&self, rows: u64) -> Option<String> {
        let action = match self.kind {
            StatementKind::Insert => "Inserted",
            StatementKind::Update => "Updated",
            StatementKind::Delete => "Deleted",
            StatementKind::Merge => "Merged",
            _ => return None,
        };
        let target = self.qualified_name().unwrap_or_default();
        Some(format!("{action} {rows} row(s) in {target}."))
    }

    /// Describes where the statement is and what it names, for errors.
    #[must_use]
    pub fn error_context(&self) -> ErrorContext {
        let context = ErrorContext::new().with_location(self.line, self.span.start);
        let context = match &self.name {
            Some(name) => context.with_object(self.owner.as_deref(), name.clone()),
            None => context,
        };
        match self.kind.object_kind() {
            Some(kind) => context.with_kind(kind),
            None => context,
        }
    }

    /// Returns `OWNER.NAME`, or just `NAME` when there is no owner.
    #[must_use]
    pub fn qualified_name(&self) -> Option<String> {
        let name = self.name.as_ref()?;
        Some(match &self.owner {
            Some(owner) => format!("{owner}.{name}"),
            None => name.clone(),
        })
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(name) = self.qualified_name() {
            write!(f, " {name}")?;
        }
        write!(f, " (line {})", self.line)
    }
}

/// Trims the matched statement text down to what an executor runs.
fn executable_text(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_suffix('/') {
        rest.trim_end().to_string()
    } else if let Some(rest) = trimmed.strip_suffix(';') {
        rest.trim_end().to_string()
    } else {
        trimmed.to_string()
    }
}
