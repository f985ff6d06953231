//! Integration tests for object identity
//!
//! Tests ObjectKind spellings, ObjectKey ordering, and DependencyEdge.

use schemaseq_foundation::{DependencyEdge, ObjectKey, ObjectKind};

// =============================================================================
// ObjectKind
// =============================================================================

#[test]
fn catalog_names_round_trip() {
    for kind in ObjectKind::ALL {
        assert_eq!(kind.catalog_name().parse::<ObjectKind>().unwrap(), kind);
    }
}

#[test]
fn catalog_names_ignore_case_and_spacing() {
    assert_eq!(
        "package   body".parse::<ObjectKind>().unwrap(),
        ObjectKind::PackageBody
    );
    assert_eq!("unique".parse::<ObjectKind>().unwrap(), ObjectKind::UniqueConstraint);
    assert!("materialized view".parse::<ObjectKind>().is_err());
}

#[test]
fn plsql_units() {
    assert!(ObjectKind::PackageBody.is_plsql_unit());
    assert!(ObjectKind::Trigger.is_plsql_unit());
    assert!(!ObjectKind::View.is_plsql_unit());
    assert!(ObjectKind::ForeignKey.is_constraint());
}

#[test]
fn capitalized_kind() {
    assert_eq!(ObjectKind::PackageBody.capitalized(), "Package body");
    assert_eq!(ObjectKind::Table.capitalized(), "Table");
}

// =============================================================================
// ObjectKey
// =============================================================================

#[test]
fn key_display() {
    let key = ObjectKey::new("SCOTT", "EMP", ObjectKind::Table);
    assert_eq!(key.to_string(), "SCOTT.EMP (TABLE)");
}

#[test]
fn keys_order_by_owner_then_name() {
    let mut keys = vec![
        ObjectKey::new("SCOTT", "B", ObjectKind::Table),
        ObjectKey::new("HR", "Z", ObjectKind::Table),
        ObjectKey::new("SCOTT", "A", ObjectKind::View),
    ];
    keys.sort();
    let names: Vec<_> = keys.iter().map(|k| format!("{}.{}", k.owner, k.name)).collect();
    assert_eq!(names, ["HR.Z", "SCOTT.A", "SCOTT.B"]);
}

#[test]
fn edge_from_tuple() {
    let from = ObjectKey::new("S", "V", ObjectKind::View);
    let to = ObjectKey::new("S", "T", ObjectKind::Table);
    let edge: DependencyEdge = (from.clone(), to.clone()).into();
    assert_eq!(edge, DependencyEdge::new(from, to));
}
