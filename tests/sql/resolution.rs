//! Integration tests for dependency resolution

use schemaseq_foundation::{ErrorKind, ObjectKey, ObjectKind};
use schemaseq_sql::{
    Directory, ErrorPolicy, GrammarKind, ParserConfig, SqlParser, Statement, StatementDetail,
    StatementKind, parse,
};

fn full(source: &str) -> Vec<Statement> {
    parse(source, GrammarKind::Full, "file", Some("scott")).unwrap()
}

fn scott(name: &str, kind: ObjectKind) -> ObjectKey {
    ObjectKey::new("SCOTT", name, kind)
}

// =============================================================================
// Basic Scenarios
// =============================================================================

#[test]
fn table_without_references() {
    let statements = full("CREATE TABLE EMP (ID NUMBER NOT NULL, NAME VARCHAR2(30));");
    assert_eq!(statements.len(), 1);
    let table = &statements[0];
    assert_eq!(table.kind, StatementKind::Create(ObjectKind::Table));
    assert_eq!(table.name.as_deref(), Some("EMP"));
    assert_eq!(table.owner.as_deref(), Some("SCOTT"));
    assert!(table.dependencies.is_empty());
}

#[test]
fn view_on_known_table() {
    let statements = full(
        "CREATE TABLE EMP (ID NUMBER NOT NULL, NAME VARCHAR2(30));\n\
         CREATE VIEW V1 AS SELECT * FROM EMP;\n",
    );
    let view = &statements[1];
    assert_eq!(view.kind, StatementKind::Create(ObjectKind::View));
    assert_eq!(view.name.as_deref(), Some("V1"));
    assert_eq!(view.dependencies, vec![scott("EMP", ObjectKind::Table)]);
}

#[test]
fn view_on_unknown_table_has_no_dependencies() {
    let statements = full("CREATE VIEW V1 AS SELECT * FROM EMP;");
    assert_eq!(statements[0].kind, StatementKind::Create(ObjectKind::View));
    assert!(statements[0].dependencies.is_empty());
}

#[test]
fn view_ahead_of_its_table_depends_on_it() {
    let statements = full(
        "create view a_v as select id from emp;\n\
         create or replace procedure p is\nbegin\n  delete from emp_log;\nend;\n/\n\
         create table emp (id number);\n\
         create table emp_log (id number);\n",
    );
    assert_eq!(statements[0].dependencies, vec![scott("EMP", ObjectKind::Table)]);
    assert_eq!(statements[1].dependencies, vec![scott("EMP_LOG", ObjectKind::Table)]);
    assert!(statements[2].dependencies.is_empty());
}

#[test]
fn forward_references_to_self_are_dropped() {
    let statements = full(
        "create or replace procedure p is\nbegin\n  p;\n  q;\nend;\n/\n\
         create or replace procedure q is\nbegin\n  null;\nend;\n/\n",
    );
    assert_eq!(statements[0].dependencies, vec![scott("Q", ObjectKind::Procedure)]);
}

#[test]
fn package_body_sees_header_and_tables() {
    let statements = full(
        "create table t (id number);\n\
         create or replace package pkg as\n  procedure run;\nend pkg;\n/\n\
         create or replace package body pkg as\n  procedure run is\n    n number;\n  begin\n    select count(*) into n from t;\n  end run;\nend pkg;\n/\n",
    );
    assert_eq!(statements.len(), 3);
    let body = &statements[2];
    assert_eq!(body.kind, StatementKind::Create(ObjectKind::PackageBody));
    assert!(body.dependencies.contains(&scott("PKG", ObjectKind::Package)));
    assert!(body.dependencies.contains(&scott("T", ObjectKind::Table)));
    assert_eq!(body.dependencies.len(), 2);
}

// =============================================================================
// Owners and Synonyms
// =============================================================================

#[test]
fn connect_switches_owner_for_later_statements() {
    let statements = full(
        "create table emp (id number);\n\
         connect hr/secret@db\n\
         create view emp_v as select id from scott.emp;\n",
    );
    assert_eq!(statements[1].kind, StatementKind::Connect);
    assert_eq!(
        statements[1].detail,
        StatementDetail::Connect {
            user: "HR".to_string(),
            dsn: Some("db".to_string())
        }
    );
    let view = &statements[2];
    assert_eq!(view.owner.as_deref(), Some("HR"));
    assert_eq!(view.dependencies, vec![scott("EMP", ObjectKind::Table)]);
}

#[test]
fn public_synonyms_resolve_for_other_owners() {
    let statements = full(
        "create table emp (id number);\n\
         create public synonym emp_syn for scott.emp;\n\
         connect hr\n\
         create view v as select id from emp_syn;\n",
    );
    let view = statements.last().unwrap();
    assert_eq!(
        view.dependencies,
        vec![ObjectKey::new("PUBLIC", "EMP_SYN", ObjectKind::PublicSynonym)]
    );
}

#[test]
fn seeded_directory_resolves_references() {
    let directory: Directory = [ObjectKey::new("HR", "DEPT", ObjectKind::Table)]
        .into_iter()
        .collect();
    let mut parser = SqlParser::new(ParserConfig::default().with_owner("hr"))
        .unwrap()
        .with_directory(directory);
    let statements = parser
        .parse("create view dept_v as select d.id from dept d;")
        .unwrap();
    assert_eq!(
        statements[0].dependencies,
        vec![ObjectKey::new("HR", "DEPT", ObjectKind::Table)]
    );
    assert!(parser.directory().contains("HR", "DEPT_V"));
}

// =============================================================================
// Grammar Choice
// =============================================================================

#[test]
fn structural_grammar_finds_names_only() {
    let source = "create table emp (id number);\n\
                  create view v as select id from emp;\n\
                  create index emp_ix on emp (id);\n";
    let statements = parse(source, GrammarKind::Structural, "file", Some("scott")).unwrap();
    assert_eq!(statements.len(), 3);
    assert!(statements[1].dependencies.is_empty());
    assert_eq!(statements[2].dependencies, vec![scott("EMP", ObjectKind::Table)]);
}

#[test]
fn single_statement_production() {
    let statements = parse(
        "create sequence emp_seq;",
        GrammarKind::Full,
        "create_sequence_statement",
        Some("scott"),
    )
    .unwrap();
    assert_eq!(statements[0].key(), Some(scott("EMP_SEQ", ObjectKind::Sequence)));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn parse_failure_has_location() {
    let err = parse(
        "create table a (id number);\ncreate view v as select ( from a;\n",
        GrammarKind::Full,
        "file",
        Some("scott"),
    )
    .unwrap_err();
    let ErrorKind::ParseFailure { line, .. } = err.kind else {
        panic!("expected parse failure, got {err}");
    };
    assert_eq!(line, 2);
}

#[test]
fn unsupported_statements_can_be_skipped() {
    let source = "create materialized view mv as select 1 x from dual;\ncreate table t (id number);\n";
    let err = parse(source, GrammarKind::Full, "file", None).unwrap_err();
    assert!(err.is_recoverable());

    let mut parser = SqlParser::new(
        ParserConfig::default()
            .with_owner("scott")
            .with_policy(ErrorPolicy::SkipUnsupported),
    )
    .unwrap();
    let statements = parser.parse(source).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].key(), Some(scott("T", ObjectKind::Table)));
}
