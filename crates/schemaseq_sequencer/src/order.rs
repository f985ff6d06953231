//! Owner-grouped topological ordering.
//!
//! The order is consumed as a creation script that switches the current
//! schema between owner groups, so the sequencer drains one owner at a
//! time. The owner chosen next is the one whose ready objects unblock the
//! most objects of other owners. Ties go to the lexically smallest owner.
//! Objects of the draining owner that become ready join its queue at once;
//! objects of other owners wait for a later group.
//!
//! The heuristic is greedy and does not minimize schema switches globally.

use std::collections::{BTreeMap, BTreeSet};

use schemaseq_foundation::{DependencyEdge, Error, ObjectKey, Result};
use tracing::{debug, warn};

use crate::graph::DependencyGraph;

/// Orders `keys` so every key follows the keys it depends on.
///
/// # Errors
///
/// Returns a cycle error listing every key that could not be emitted
/// together with its unresolved dependencies.
pub fn order<E>(
    keys: impl IntoIterator<Item = ObjectKey>,
    edges: impl IntoIterator<Item = E>,
) -> Result<Vec<ObjectKey>>
where
    E: Into<DependencyEdge>,
{
    order_graph(&DependencyGraph::build(keys, edges))
}

/// Orders the keys of an already built graph.
///
/// # Errors
///
/// Returns a cycle error if some keys can never become ready.
pub fn order_graph(graph: &DependencyGraph) -> Result<Vec<ObjectKey>> {
    Sequencer::new(graph).run()
}

struct Sequencer<'g> {
    graph: &'g DependencyGraph,
    /// Unresolved dependencies of every key not yet emitted.
    remaining: BTreeMap<&'g ObjectKey, BTreeSet<&'g ObjectKey>>,
    /// Ready keys waiting for their owner's turn.
    ready: BTreeMap<&'g str, BTreeSet<&'g ObjectKey>>,
    emitted: Vec<ObjectKey>,
}

impl<'g> Sequencer<'g> {
    fn new(graph: &'g DependencyGraph) -> Self {
        let mut remaining = BTreeMap::new();
        let mut ready: BTreeMap<&str, BTreeSet<&ObjectKey>> = BTreeMap::new();
        for key in graph.keys() {
            let pending: BTreeSet<&ObjectKey> = graph
                .depends_on(key)
                .into_iter()
                .flatten()
                .collect();
            if pending.is_empty() {
                ready.entry(key.owner.as_str()).or_default().insert(key);
            }
            remaining.insert(key, pending);
        }
        Self {
            graph,
            remaining,
            ready,
            emitted: Vec::with_capacity(graph.len()),
        }
    }

    fn run(mut self) -> Result<Vec<ObjectKey>> {
        while !self.remaining.is_empty() {
            let Some(owner) = self.next_owner() else {
                return Err(self.cycle());
            };
            self.drain(owner);
        }
        Ok(self.emitted)
    }

    /// Picks the owner whose ready keys are referenced by the most blocked
    /// keys of other owners.
    fn next_owner(&self) -> Option<&'g str> {
        let mut best: Option<(&'g str, usize)> = None;
        for (&owner, keys) in &self.ready {
            let referrers = self.blocked_referrers(owner, keys);
            if best.is_none_or(|(_, score)| referrers > score) {
                best = Some((owner, referrers));
            }
        }
        let (owner, referrers) = best?;
        debug!(owner, referrers, "selected owner group");
        Some(owner)
    }

    fn blocked_referrers(&self, owner: &str, keys: &BTreeSet<&'g ObjectKey>) -> usize {
        let referrers: BTreeSet<&ObjectKey> = keys
            .iter()
            .filter_map(|key| self.graph.dependents(key))
            .flatten()
            .filter(|referrer| referrer.owner != owner)
            .filter(|referrer| {
                self.remaining
                    .get(referrer)
                    .is_some_and(|pending| !pending.is_empty())
            })
            .collect();
        referrers.len()
    }

    /// Emits the owner's ready keys wave by wave.
    fn drain(&mut self, owner: &'g str) {
        let mut wave = self.ready.remove(owner).unwrap_or_default();
        while !wave.is_empty() {
            debug!(owner, keys = wave.len(), "emitting wave");
            let mut next = BTreeSet::new();
            for key in wave {
                self.remaining.remove(key);
                self.emitted.push(key.clone());
                for referrer in self.graph.dependents(key).into_iter().flatten() {
                    let Some(pending) = self.remaining.get_mut(referrer) else {
                        continue;
                    };
                    if !pending.remove(key) || !pending.is_empty() {
                        continue;
                    }
                    if referrer.owner == owner {
                        next.insert(referrer);
                    } else {
                        self.ready
                            .entry(referrer.owner.as_str())
                            .or_default()
                            .insert(referrer);
                    }
                }
            }
            wave = next;
        }
    }

    fn cycle(&self) -> Error {
        let remaining: Vec<(ObjectKey, Vec<ObjectKey>)> = self
            .remaining
            .iter()
            .map(|(&key, pending)| (key.clone(), pending.iter().map(|&k| k.clone()).collect()))
            .collect();
        for (key, pending) in &remaining {
            let pending: Vec<String> = pending.iter().map(ToString::to_string).collect();
            warn!(key = %key, waiting_on = ?pending, "unresolved dependency");
        }
        Error::cycle(remaining)
    }
}
