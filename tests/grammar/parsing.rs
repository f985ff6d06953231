//! Integration tests for parsing and parse trees

use proptest::prelude::*;
use schemaseq_foundation::ErrorKind;
use schemaseq_grammar::{Grammar, Matcher};

const ARITHMETIC: &str = r"
    expr = term (ws op ws term)* ;
    transparent term = number / group ;
    group = '(' ws expr ws ')' ;
    number = [0-9]+ ;
    op = '+' / '-' / '*' ;
    silent ws = ' '* ;
";

fn arithmetic() -> Grammar {
    Grammar::compile(ARITHMETIC).unwrap()
}

// =============================================================================
// Whole-Input Parsing
// =============================================================================

#[test]
fn parse_builds_tree() {
    let grammar = arithmetic();
    let tree = grammar.parse("expr", "1 + (2 * 3)").unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tree.rule_name(root), "expr");

    let children: Vec<_> = tree.children(root).iter().map(|&c| tree.rule_name(c)).collect();
    assert_eq!(children, ["number", "op", "group"]);

    let group = tree.child_by_rule(root, "group").unwrap();
    assert_eq!(tree.text(group), "(2 * 3)");
    assert_eq!(tree.children_by_rule(tree.children(group)[0], "number").len(), 2);
    assert_eq!(tree.span(group).column, 5);
}

#[test]
fn descendants_are_pre_order() {
    let grammar = arithmetic();
    let tree = grammar.parse("expr", "(1)+2").unwrap();
    let root = tree.root().unwrap();
    let numbers: Vec<_> = tree
        .descendants(root)
        .into_iter()
        .filter(|&id| tree.is(id, "number"))
        .map(|id| tree.text(id))
        .collect();
    assert_eq!(numbers, ["1", "2"]);
    assert!(tree.find_descendant(root, "op").is_some());
}

#[test]
fn trailing_input_is_a_parse_failure() {
    let grammar = arithmetic();
    let err = grammar.parse("expr", "1 + 2 )").unwrap_err();
    let ErrorKind::ParseFailure { position, line, .. } = err.kind else {
        panic!("expected parse failure, got {err}");
    };
    assert_eq!(line, 1);
    assert!(position >= 5);
}

#[test]
fn failure_reports_furthest_position() {
    let grammar = arithmetic();
    let err = grammar.parse("expr", "1 + (2 * )").unwrap_err();
    let ErrorKind::ParseFailure { position, expected, .. } = err.kind else {
        panic!("expected parse failure, got {err}");
    };
    assert_eq!(position, 9);
    assert!(expected.iter().any(|e| e.contains("0-9")));
}

#[test]
fn unknown_start_rule() {
    let grammar = arithmetic();
    let err = grammar.parse("statement", "1").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownProduction(_)));
}

#[test]
fn matcher_is_reusable() {
    let grammar = arithmetic();
    let number = grammar.rule_id("number").unwrap();
    let text = "12 + 345";
    let mut matcher = Matcher::new(&grammar, text);
    assert_eq!(matcher.match_rule(number, 0).unwrap().unwrap().end, 2);
    assert_eq!(matcher.match_rule(number, 5).unwrap().unwrap().end, 8);
    assert!(matcher.match_rule(number, 2).unwrap().is_none());
}

// =============================================================================
// Properties
// =============================================================================

fn expression() -> impl Strategy<Value = String> {
    let leaf = "[0-9]{1,3}".prop_map(String::from);
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop_oneof![Just("+"), Just("-"), Just("*")], inner.clone())
                .prop_map(|(a, op, b)| format!("{a} {op} {b}")),
            inner.prop_map(|e| format!("({e})")),
        ]
    })
}

proptest! {
    #[test]
    fn well_formed_expressions_parse(text in expression()) {
        let grammar = arithmetic();
        let tree = grammar.parse("expr", &text).unwrap();
        let root = tree.root().unwrap();
        prop_assert_eq!(tree.span(root).end, text.len());
    }

    #[test]
    fn arbitrary_input_never_panics(text in "[0-9()+* a-z]{0,40}") {
        let grammar = arithmetic();
        let _ = grammar.parse("expr", &text);
    }

    #[test]
    fn parsing_is_deterministic(text in expression()) {
        let grammar = arithmetic();
        let first = grammar.parse("expr", &text).unwrap().dump();
        let second = grammar.parse("expr", &text).unwrap().dump();
        prop_assert_eq!(first, second);
    }
}
