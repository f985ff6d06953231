//! Integration tests for Error types
//!
//! Tests error construction, display, context, and recoverability.

use schemaseq_foundation::{Error, ErrorContext, ErrorKind, ObjectKey, ObjectKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_parse_failure() {
    let err = Error::parse_failure(40, 3, 7, "frob x;", vec!["'table'".to_string(), "'view'".to_string()]);
    assert!(matches!(err.kind, ErrorKind::ParseFailure { line: 3, column: 7, .. }));
    let msg = format!("{err}");
    assert!(msg.contains("3:7"));
    assert!(msg.contains("'table', 'view'"));
}

#[test]
fn error_cycle_lists_blocked_keys() {
    let a = ObjectKey::new("S", "A", ObjectKind::View);
    let b = ObjectKey::new("S", "B", ObjectKind::View);
    let err = Error::cycle(vec![(a.clone(), vec![b.clone()]), (b, vec![a])]);
    let ErrorKind::CycleDetected { remaining } = &err.kind else {
        panic!("expected a cycle error, got {err}");
    };
    assert_eq!(remaining.len(), 2);
    assert!(format!("{err}").contains("2 objects"));
}

#[test]
fn error_unknown_production() {
    let err = Error::unknown_production("no_such_rule");
    assert!(matches!(err.kind, ErrorKind::UnknownProduction(ref name) if name == "no_such_rule"));
}

// =============================================================================
// Recoverability
// =============================================================================

#[test]
fn only_unsupported_constructs_are_recoverable() {
    assert!(Error::unsupported("create materialized view").is_recoverable());
    assert!(!Error::missing_prerequisite("package PKG").is_recoverable());
    assert!(!Error::grammar("bad").is_recoverable());
    assert!(!Error::parse_failure(0, 1, 1, "", vec![]).is_recoverable());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_is_appended_to_display() {
    let err = Error::missing_prerequisite("package PKG").with_context(
        ErrorContext::new()
            .with_object(Some("SCOTT"), "PKG")
            .with_kind(ObjectKind::PackageBody)
            .with_location(12, 340),
    );
    let msg = format!("{err}");
    assert!(msg.contains("at SCOTT.PKG (PACKAGE BODY)"));
    assert!(msg.contains("line 12"));
}

#[test]
fn empty_context_adds_nothing() {
    let bare = format!("{}", Error::unsupported("x"));
    let with_empty = format!("{}", Error::unsupported("x").with_context(ErrorContext::new()));
    assert_eq!(bare, with_empty);
}
