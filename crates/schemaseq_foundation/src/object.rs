//! Schema object identity.
//!
//! An [`ObjectKey`] names a database object by owner, name, and
//! [`ObjectKind`]. Keys are what the dependency resolver emits and what the
//! sequencer orders.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The closed set of schema object kinds.
///
/// Ordering follows declaration order and is only used to make collections
/// of keys deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    /// A table (including global temporary tables).
    Table,
    /// A view.
    View,
    /// An index on a table.
    Index,
    /// A sequence.
    Sequence,
    /// A private synonym.
    Synonym,
    /// A public synonym (owned by `PUBLIC`).
    PublicSynonym,
    /// A package specification.
    Package,
    /// A package body.
    PackageBody,
    /// An object or collection type specification.
    Type,
    /// A type body.
    TypeBody,
    /// A trigger.
    Trigger,
    /// A standalone procedure.
    Procedure,
    /// A standalone function.
    Function,
    /// A role.
    Role,
    /// A user.
    User,
    /// An application context.
    Context,
    /// A primary key constraint.
    PrimaryKey,
    /// A unique constraint.
    UniqueConstraint,
    /// A foreign key constraint.
    ForeignKey,
    /// A check constraint.
    CheckConstraint,
}

impl ObjectKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 20] = [
        Self::Table,
        Self::View,
        Self::Index,
        Self::Sequence,
        Self::Synonym,
        Self::PublicSynonym,
        Self::Package,
        Self::PackageBody,
        Self::Type,
        Self::TypeBody,
        Self::Trigger,
        Self::Procedure,
        Self::Function,
        Self::Role,
        Self::User,
        Self::Context,
        Self::PrimaryKey,
        Self::UniqueConstraint,
        Self::ForeignKey,
        Self::CheckConstraint,
    ];

    /// Returns the spelling used by the data dictionary.
    #[must_use]
    pub const fn catalog_name(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::Index => "INDEX",
            Self::Sequence => "SEQUENCE",
            Self::Synonym => "SYNONYM",
            Self::PublicSynonym => "PUBLIC SYNONYM",
            Self::Package => "PACKAGE",
            Self::PackageBody => "PACKAGE BODY",
            Self::Type => "TYPE",
            Self::TypeBody => "TYPE BODY",
            Self::Trigger => "TRIGGER",
            Self::Procedure => "PROCEDURE",
            Self::Function => "FUNCTION",
            Self::Role => "ROLE",
            Self::User => "USER",
            Self::Context => "CONTEXT",
            Self::PrimaryKey => "PRIMARY KEY",
            Self::UniqueConstraint => "UNIQUE CONSTRAINT",
            Self::ForeignKey => "FOREIGN KEY",
            Self::CheckConstraint => "CHECK CONSTRAINT",
        }
    }

    /// Parses a data dictionary spelling such as `"package body"`.
    ///
    /// Matching ignores case and collapses runs of whitespace. The bare
    /// constraint keywords `"UNIQUE"` and `"CHECK"` are accepted as well.
    ///
    /// # Errors
    ///
    /// Returns an unsupported construct error for any other spelling.
    pub fn from_catalog_name(name: &str) -> Result<Self> {
        let normalized = name
            .split_whitespace()
            .map(str::to_ascii_uppercase)
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "UNIQUE" => return Ok(Self::UniqueConstraint),
            "CHECK" => return Ok(Self::CheckConstraint),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.catalog_name() == normalized)
            .ok_or_else(|| Error::unsupported(format!("object kind {normalized}")))
    }

    /// Returns true for kinds whose source is a PL/SQL unit terminated by a
    /// line containing only `/`.
    #[must_use]
    pub const fn is_plsql_unit(self) -> bool {
        matches!(
            self,
            Self::Package
                | Self::PackageBody
                | Self::Type
                | Self::TypeBody
                | Self::Trigger
                | Self::Procedure
                | Self::Function
        )
    }

    /// Returns true for the constraint kinds.
    #[must_use]
    pub const fn is_constraint(self) -> bool {
        matches!(
            self,
            Self::PrimaryKey | Self::UniqueConstraint | Self::ForeignKey | Self::CheckConstraint
        )
    }

    /// Returns the kind name capitalized for log messages ("Package body").
    #[must_use]
    pub fn capitalized(self) -> String {
        let lower = self.catalog_name().to_ascii_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_name())
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_catalog_name(s)
    }
}

/// The (owner, name, kind) triple identifying a schema object.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectKey {
    /// The owning schema.
    pub owner: String,
    /// The object name.
    pub name: String,
    /// The object kind.
    pub kind: ObjectKind,
}

impl ObjectKey {
    /// Creates a new key.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.owner, self.name, self.kind)
    }
}

/// A raw dependency relation: `from` depends on `to`.
///
/// This is the `(owner, name, kind, refOwner, refName, refKind)` row shape
/// that catalog introspection produces.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DependencyEdge {
    /// The dependent object.
    pub from: ObjectKey,
    /// The object depended upon.
    pub to: ObjectKey,
}

impl DependencyEdge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(from: ObjectKey, to: ObjectKey) -> Self {
        Self { from, to }
    }
}

impl From<(ObjectKey, ObjectKey)> for DependencyEdge {
    fn from((from, to): (ObjectKey, ObjectKey)) -> Self {
        Self::new(from, to)
    }
}
