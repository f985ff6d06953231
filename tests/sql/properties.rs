//! Property tests for parsing and dependency resolution

use std::collections::BTreeSet;

use proptest::prelude::*;
use schemaseq_foundation::{ObjectKey, ObjectKind};
use schemaseq_sql::{GrammarKind, parse};

fn tables(count: usize) -> String {
    (0..count)
        .map(|i| format!("create table t{i} (id number);\n"))
        .collect()
}

fn table_key(i: usize) -> ObjectKey {
    ObjectKey::new("SCOTT", format!("T{i}"), ObjectKind::Table)
}

/// A table count and a non-empty subset of those tables.
fn tables_and_subset() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..6).prop_flat_map(|count| {
        (
            Just(count),
            prop::collection::btree_set(0..count, 1..=count).prop_map(|set| set.into_iter().collect()),
        )
    })
}

proptest! {
    #[test]
    fn view_depends_on_exactly_its_tables((count, used) in tables_and_subset()) {
        let from = used.iter().map(|i| format!("t{i}")).collect::<Vec<_>>().join(", ");
        let source = format!("{}create view v as select 1 x from {from};\n", tables(count));
        let statements = parse(&source, GrammarKind::Full, "file", Some("scott")).unwrap();

        let view = statements.last().unwrap();
        let actual: BTreeSet<_> = view.dependencies.iter().cloned().collect();
        let expected: BTreeSet<_> = used.iter().map(|&i| table_key(i)).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn locals_shadow_objects(count in 2usize..6, a in 0usize..6, b in 0usize..6) {
        let (a, b) = (a % count, b % count);
        prop_assume!(a != b);
        let source = format!(
            "{}create or replace procedure p (t{a} in number) is\n  t{b} number := t{a};\nbegin\n  t{b} := t{a} + 1;\nend;\n/\n",
            tables(count)
        );
        let statements = parse(&source, GrammarKind::Full, "file", Some("scott")).unwrap();
        prop_assert!(statements.last().unwrap().dependencies.is_empty());
    }

    #[test]
    fn parsing_is_deterministic((count, used) in tables_and_subset()) {
        let mut source = tables(count);
        for &i in &used {
            source.push_str(&format!("create index t{i}_ix on t{i} (id);\n"));
        }
        for grammar in [GrammarKind::Structural, GrammarKind::Full] {
            let first = parse(&source, grammar, "file", Some("scott")).unwrap();
            let second = parse(&source, grammar, "file", Some("scott")).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn arbitrary_input_never_panics(text in "[a-z0-9 ;()',\n/]{0,60}") {
        for grammar in [GrammarKind::Structural, GrammarKind::Full] {
            let _ = parse(&text, grammar, "file", Some("scott"));
        }
    }
}
