//! Property tests for ordering random dependency graphs

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use schemaseq_foundation::{ErrorKind, ObjectKey, ObjectKind};
use schemaseq_sequencer::order;

const OWNERS: [&str; 3] = ["APP", "HR", "SCOTT"];

fn key(i: usize, owner: usize) -> ObjectKey {
    ObjectKey::new(OWNERS[owner], format!("OBJ{i:02}"), ObjectKind::View)
}

/// Keys with random owners and edges that only point to earlier keys.
fn dag() -> impl Strategy<Value = (Vec<ObjectKey>, Vec<(ObjectKey, ObjectKey)>)> {
    (1usize..16).prop_flat_map(|count| {
        (
            prop::collection::vec(0..OWNERS.len(), count),
            prop::collection::vec((0..count, 0..count), 0..count * 2),
        )
            .prop_map(|(owners, pairs)| {
                let keys: Vec<_> = owners.iter().enumerate().map(|(i, &o)| key(i, o)).collect();
                let edges = pairs
                    .into_iter()
                    .filter(|(from, to)| from > to)
                    .map(|(from, to)| (keys[from].clone(), keys[to].clone()))
                    .collect();
                (keys, edges)
            })
    })
}

proptest! {
    #[test]
    fn every_key_follows_its_dependencies((keys, edges) in dag()) {
        let ordered = order(keys.clone(), edges.clone()).unwrap();

        let emitted: BTreeSet<_> = ordered.iter().cloned().collect();
        let expected: BTreeSet<_> = keys.iter().cloned().collect();
        prop_assert_eq!(ordered.len(), keys.len());
        prop_assert_eq!(emitted, expected);

        let position: BTreeMap<_, _> = ordered.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect();
        for (from, to) in &edges {
            prop_assert!(position[to] < position[from], "{} before {}", from, to);
        }
    }

    #[test]
    fn ordering_is_deterministic((keys, edges) in dag()) {
        let first = order(keys.clone(), edges.clone()).unwrap();
        let mut reversed_keys = keys;
        reversed_keys.reverse();
        let mut reversed_edges = edges;
        reversed_edges.reverse();
        let second = order(reversed_keys, reversed_edges).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn back_edges_are_detected((keys, edges) in dag()) {
        // Any forward edge plus its reverse is a cycle.
        prop_assume!(!edges.is_empty());
        let (from, to) = edges[0].clone();
        let mut cyclic = edges;
        cyclic.push((to.clone(), from.clone()));
        let err = order(keys, cyclic).unwrap_err();
        let ErrorKind::CycleDetected { remaining } = err.kind else {
            panic!("expected a cycle, got {err}");
        };
        let blocked: BTreeSet<_> = remaining.into_iter().map(|(key, _)| key).collect();
        prop_assert!(blocked.contains(&from));
        prop_assert!(blocked.contains(&to));
    }
}
