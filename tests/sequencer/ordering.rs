//! Integration tests for creation ordering

use schemaseq_foundation::{DependencyEdge, ErrorKind, ObjectKey, ObjectKind};
use schemaseq_sequencer::{DependencyGraph, order, order_graph};

fn view(owner: &str, name: &str) -> ObjectKey {
    ObjectKey::new(owner, name, ObjectKind::View)
}

fn table(owner: &str, name: &str) -> ObjectKey {
    ObjectKey::new(owner, name, ObjectKind::Table)
}

// =============================================================================
// Basic Ordering
// =============================================================================

#[test]
fn chain_is_reversed() {
    let (a, b, c) = (view("S", "A"), view("S", "B"), view("S", "C"));
    let ordered = order(
        [a.clone(), b.clone(), c.clone()],
        [(a.clone(), b.clone()), (b.clone(), c.clone())],
    )
    .unwrap();
    assert_eq!(ordered, vec![c, b, a]);
}

#[test]
fn independent_keys_are_lexical() {
    let keys = vec![table("S", "Z"), table("S", "A"), view("S", "M")];
    let ordered = order(keys, Vec::<DependencyEdge>::new()).unwrap();
    let names: Vec<_> = ordered.iter().map(|k| k.name.as_str()).collect();
    assert_eq!(names, ["A", "M", "Z"]);
}

#[test]
fn owners_are_drained_in_groups() {
    // HR.V needs SCOTT.T; SCOTT.W needs HR.V.
    let t = table("SCOTT", "T");
    let u = table("SCOTT", "U");
    let v = view("HR", "V");
    let w = view("SCOTT", "W");
    let x = table("HR", "X");
    let ordered = order(
        [t.clone(), u.clone(), v.clone(), w.clone(), x.clone()],
        [(v.clone(), t.clone()), (w.clone(), v.clone())],
    )
    .unwrap();
    // SCOTT unblocks HR.V, so SCOTT's ready keys go first.
    assert_eq!(ordered, vec![t, u, v, x, w]);
}

#[test]
fn edges_through_outside_objects_are_kept() {
    // V -> SYN (not of interest) -> T
    let v = view("S", "V");
    let t = table("S", "T");
    let syn = ObjectKey::new("S", "SYN", ObjectKind::Synonym);
    let graph = DependencyGraph::build(
        [v.clone(), t.clone()],
        [(v.clone(), syn.clone()), (syn, t.clone())],
    );
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.depends_on(&v).unwrap().contains(&t));
    assert_eq!(order_graph(&graph).unwrap(), vec![t, v]);
}

#[test]
fn empty_input_gives_empty_order() {
    let ordered = order(Vec::new(), Vec::<DependencyEdge>::new()).unwrap();
    assert!(ordered.is_empty());
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn cycle_is_reported_with_blocked_keys() {
    let (a, b, c) = (view("S", "A"), view("S", "B"), table("S", "C"));
    let err = order(
        [a.clone(), b.clone(), c.clone()],
        [(a.clone(), b.clone()), (b.clone(), a.clone()), (a.clone(), c.clone())],
    )
    .unwrap_err();
    let ErrorKind::CycleDetected { remaining } = err.kind else {
        panic!("expected a cycle, got {err}");
    };
    let blocked: Vec<_> = remaining.iter().map(|(key, _)| key.clone()).collect();
    assert_eq!(blocked, vec![a.clone(), b.clone()]);
    assert_eq!(remaining[0].1, vec![b]);
}

#[test]
fn self_references_are_not_cycles() {
    let a = view("S", "A");
    let ordered = order([a.clone()], [(a.clone(), a.clone())]).unwrap();
    assert_eq!(ordered, vec![a]);
}
