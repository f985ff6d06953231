//! The per-session object directory.
//!
//! The directory maps `(owner, name)` to the key of the object registered
//! under that name, so later statements can resolve references to earlier
//! ones. Package and type headers also leave their top-level identifiers
//! here for the matching body to pick up.

use std::collections::BTreeMap;

use schemaseq_foundation::{ObjectKey, ObjectKind};

/// Owner used for public synonyms.
pub const PUBLIC_OWNER: &str = "PUBLIC";

/// Owner used for roles, users, and contexts.
pub const SYSTEM_OWNER: &str = "SYSTEM";

/// Registered objects of one processing session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Directory {
    objects: BTreeMap<(String, String), ObjectKey>,
    identifiers: BTreeMap<(String, String), Vec<Vec<String>>>,
}

impl Directory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object.
    ///
    /// A later registration under the same owner and name replaces the
    /// earlier one, except that bodies never shadow their header: a package
    /// body or type body is only recorded when nothing holds its name yet.
    pub fn register(&mut self, key: ObjectKey) {
        let slot = (key.owner.clone(), key.name.clone());
        if matches!(key.kind, ObjectKind::PackageBody | ObjectKind::TypeBody)
            && self.objects.contains_key(&slot)
        {
            return;
        }
        self.objects.insert(slot, key);
    }

    /// Looks up an object by owner and name.
    #[must_use]
    pub fn get(&self, owner: &str, name: &str) -> Option<&ObjectKey> {
        self.objects.get(&(owner.to_string(), name.to_string()))
    }

    /// Returns true if an object is registered under owner and name.
    #[must_use]
    pub fn contains(&self, owner: &str, name: &str) -> bool {
        self.get(owner, name).is_some()
    }

    /// Returns the number of registered objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates over registered keys ordered by owner and name.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectKey> {
        self.objects.values()
    }

    /// Records the top-level identifiers declared by a package or type header.
    pub fn store_identifiers(&mut self, owner: &str, name: &str, identifiers: Vec<Vec<String>>) {
        self.identifiers
            .insert((owner.to_string(), name.to_string()), identifiers);
    }

    /// Returns the identifiers a header declared, if the header was seen.
    #[must_use]
    pub fn identifiers(&self, owner: &str, name: &str) -> Option<&[Vec<String>]> {
        self.identifiers
            .get(&(owner.to_string(), name.to_string()))
            .map(Vec::as_slice)
    }

    /// Resolves a qualified reference.
    ///
    /// Tries, in order: the first two parts as `owner.name`; the first part
    /// as a name owned by `owner`; the first part as a public synonym.
    #[must_use]
    pub fn resolve(&self, parts: &[String], owner: Option<&str>) -> Option<&ObjectKey> {
        let first = parts.first()?;
        parts
            .get(1)
            .and_then(|second| self.get(first, second))
            .or_else(|| owner.and_then(|owner| self.get(owner, first)))
            .or_else(|| self.get(PUBLIC_OWNER, first))
    }
}

impl Extend<ObjectKey> for Directory {
    fn extend<I: IntoIterator<Item = ObjectKey>>(&mut self, iter: I) {
        for key in iter {
            self.register(key);
        }
    }
}

impl FromIterator<ObjectKey> for Directory {
    fn from_iter<I: IntoIterator<Item = ObjectKey>>(iter: I) -> Self {
        let mut directory = Self::new();
        directory.extend(iter);
        directory
    }
}
