//! Integration tests for grammar compilation

use schemaseq_foundation::ErrorKind;
use schemaseq_grammar::{Grammar, RuleMode};
use schemaseq_sql::{GrammarKind, grammars};

// =============================================================================
// Valid Grammars
// =============================================================================

#[test]
fn rules_keep_definition_order_and_modes() {
    let grammar = Grammar::compile(
        r"
        # a comment
        list = item (sep item)* ;
        silent sep = ',' ' '* ;
        transparent item = word / number ;
        word = [a-z]+ ;
        number = [0-9]+ ;
        ",
    )
    .unwrap();
    let names: Vec<_> = grammar.rule_names().collect();
    assert_eq!(names, ["list", "sep", "item", "word", "number"]);
    let sep = grammar.rule_id("sep").unwrap();
    assert_eq!(grammar.rule(sep).mode, RuleMode::Silent);
    assert_eq!(grammar.rule_name(sep), "sep");
}

#[test]
fn sql_grammars_compile() {
    for kind in [GrammarKind::Structural, GrammarKind::Full] {
        let grammar = grammars::grammar(kind).unwrap();
        assert!(grammar.rule_id("file").is_some(), "{kind} has no file rule");
        assert!(grammar.rule_id("sql_statement").is_some());
        assert!(grammar.rule_id("separator").is_some());
    }
}

#[test]
fn full_grammar_is_larger() {
    let structural = grammars::grammar(GrammarKind::Structural).unwrap();
    let full = grammars::grammar(GrammarKind::Full).unwrap();
    assert!(full.len() > structural.len());
}

// =============================================================================
// Invalid Grammars
// =============================================================================

fn compile_error(source: &str) -> String {
    let err = Grammar::compile(source).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Grammar(_)), "unexpected error: {err}");
    err.to_string()
}

#[test]
fn duplicate_rules_are_rejected() {
    let msg = compile_error("a = 'x' ;\na = 'y' ;");
    assert!(msg.contains("more than once"));
}

#[test]
fn undefined_references_are_rejected() {
    let msg = compile_error("a = b ;");
    assert!(msg.contains("undefined rule `b`"));
}

#[test]
fn left_recursion_is_rejected() {
    let msg = compile_error("expr = expr '+' term / term ;\nterm = [0-9] ;");
    assert!(msg.contains("left-recursive"));
    compile_error("a = b 'x' ;\nb = c? a ;\nc = 'c' ;");
}

#[test]
fn malformed_notation_is_rejected() {
    compile_error("a = 'x'");
    compile_error("a = ('x' ;");
    compile_error("= 'x' ;");
}
