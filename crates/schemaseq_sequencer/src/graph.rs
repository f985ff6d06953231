//! Dependency graphs restricted to a set of keys of interest.
//!
//! Raw edges may pass through objects outside the interest set, for
//! example a view reading a table through a synonym that is not being
//! exported. Such chains are followed until they reach a key of interest,
//! so `A -> X -> B` with `X` outside the set becomes `A -> B`.

use std::collections::{BTreeMap, BTreeSet};

use schemaseq_foundation::{DependencyEdge, ObjectKey};

/// Forward and reverse adjacency among keys of interest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    depends_on: BTreeMap<ObjectKey, BTreeSet<ObjectKey>>,
    dependents: BTreeMap<ObjectKey, BTreeSet<ObjectKey>>,
}

impl DependencyGraph {
    /// Builds the graph for `keys` from raw `edges`.
    ///
    /// Self-edges, including ones that loop back through keys outside the
    /// interest set, are dropped.
    pub fn build<E>(
        keys: impl IntoIterator<Item = ObjectKey>,
        edges: impl IntoIterator<Item = E>,
    ) -> Self
    where
        E: Into<DependencyEdge>,
    {
        let mut raw: BTreeMap<ObjectKey, Vec<ObjectKey>> = BTreeMap::new();
        for edge in edges {
            let edge = edge.into();
            raw.entry(edge.from).or_default().push(edge.to);
        }

        let mut depends_on: BTreeMap<ObjectKey, BTreeSet<ObjectKey>> =
            keys.into_iter().map(|key| (key, BTreeSet::new())).collect();
        let mut dependents: BTreeMap<ObjectKey, BTreeSet<ObjectKey>> = depends_on
            .keys()
            .map(|key| (key.clone(), BTreeSet::new()))
            .collect();

        for (key, targets) in &mut depends_on {
            *targets = reachable(key, &raw, &dependents);
            for target in targets.iter() {
                if let Some(referrers) = dependents.get_mut(target) {
                    referrers.insert(key.clone());
                }
            }
        }

        Self {
            depends_on,
            dependents,
        }
    }

    /// Returns the number of keys of interest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depends_on.len()
    }

    /// Returns true if there are no keys of interest.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depends_on.is_empty()
    }

    /// Returns true if `key` is a key of interest.
    #[must_use]
    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.depends_on.contains_key(key)
    }

    /// Iterates over the keys of interest in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &ObjectKey> {
        self.depends_on.keys()
    }

    /// Returns the keys `key` depends on.
    #[must_use]
    pub fn depends_on(&self, key: &ObjectKey) -> Option<&BTreeSet<ObjectKey>> {
        self.depends_on.get(key)
    }

    /// Returns the keys that depend on `key`.
    #[must_use]
    pub fn dependents(&self, key: &ObjectKey) -> Option<&BTreeSet<ObjectKey>> {
        self.dependents.get(key)
    }

    /// Returns the number of edges between keys of interest.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.depends_on.values().map(BTreeSet::len).sum()
    }
}

/// Collects the keys of interest reachable from `start`, stopping at the
/// first key of interest along each chain.
fn reachable<V>(
    start: &ObjectKey,
    raw: &BTreeMap<ObjectKey, Vec<ObjectKey>>,
    interest: &BTreeMap<ObjectKey, V>,
) -> BTreeSet<ObjectKey> {
    let mut found = BTreeSet::new();
    let mut visited: BTreeSet<&ObjectKey> = BTreeSet::new();
    let mut pending: Vec<&ObjectKey> = raw.get(start).into_iter().flatten().collect();

    while let Some(target) = pending.pop() {
        if target == start {
            continue;
        }
        if interest.contains_key(target) {
            found.insert(target.clone());
        } else if visited.insert(target) {
            pending.extend(raw.get(target).into_iter().flatten());
        }
    }
    found
}
