//! Integration tests for sessions, snapshots and the REPL

use schemaseq_foundation::{ObjectKey, ObjectKind, Result};
use schemaseq_runtime::{LineEditor, ReadResult, Repl, Session, describe, snapshot};
use schemaseq_sql::{GrammarKind, ParserConfig};

fn session() -> Session {
    Session::with_config(ParserConfig::default().with_owner("scott"))
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn objects_from_earlier_inputs_resolve() {
    let mut session = session();
    session.eval("create table emp (id number);").unwrap();
    session.eval("create public synonym emp for scott.emp;").unwrap();
    session.eval("connect hr/hr\n").unwrap();
    let statements = session.eval("create view v as select id from emp;").unwrap();

    assert_eq!(statements[0].owner.as_deref(), Some("HR"));
    assert_eq!(
        statements[0].dependencies,
        vec![ObjectKey::new("PUBLIC", "EMP", ObjectKind::PublicSynonym)]
    );
}

#[test]
fn structural_sessions_still_order() {
    let mut session = Session::with_config(ParserConfig::structural().with_owner("scott"));
    session
        .eval("create view v as select id from emp;\ncreate table emp (id number);\n")
        .unwrap();
    let order = session.order().unwrap();
    assert_eq!(order.len(), 2);
    assert_eq!(session.config().grammar, GrammarKind::Structural);
}

#[test]
fn describe_shows_synonym_targets() {
    let mut session = session();
    let statements = session
        .eval("create table emp (id number);\ncreate synonym e for emp;\n")
        .unwrap();
    let text = describe(&statements[1]);
    assert!(text.starts_with("CREATE SYNONYM SCOTT.E"));
    assert!(text.contains(" for SCOTT.EMP"));
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn snapshots_survive_a_file_round_trip() {
    let path = std::env::temp_dir().join(format!("schemaseq_it_{}.msgpack", std::process::id()));

    let mut first = session();
    first
        .eval("create table emp (id number);\nconnect hr/hr\ncreate table jobs (id number);\n")
        .unwrap();
    snapshot::save_to_file(&first.snapshot(), &path).unwrap();

    let mut second = Session::new();
    second.restore(snapshot::load_from_file(&path).unwrap());
    assert_eq!(second.owner(), Some("HR"));
    let statements = second
        .eval("create view v as select j.id from jobs j, scott.emp e;")
        .unwrap();
    assert_eq!(statements[0].dependencies.len(), 2);

    let _ = std::fs::remove_file(&path);
}

// =============================================================================
// REPL
// =============================================================================

struct Scripted(Vec<String>);

impl LineEditor for Scripted {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        if self.0.is_empty() {
            Ok(ReadResult::Eof)
        } else {
            Ok(ReadResult::Line(self.0.remove(0)))
        }
    }

    fn add_history(&mut self, _line: &str) {}
}

#[test]
fn repl_runs_a_scripted_session() {
    let lines = [
        "create table emp (id number);",
        "create or replace procedure p is",
        "begin",
        "  delete from emp;",
        "end;",
        "/",
        "\\quit",
    ];
    let editor = Scripted(lines.iter().map(|line| (*line).to_string()).collect());
    let mut repl = Repl::with_editor(editor).with_session(session()).without_banner();
    repl.run().unwrap();

    let statements = repl.session().statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[1].dependencies,
        vec![ObjectKey::new("SCOTT", "EMP", ObjectKind::Table)]
    );
}

#[test]
fn repl_order_command_after_eval() {
    let mut repl = Repl::with_editor(Scripted(Vec::new()))
        .with_session(session())
        .without_banner();
    repl.eval("create view v as select id from emp;").unwrap();
    repl.eval("create table emp (id number);").unwrap();
    let output = repl.eval("\\order").unwrap();
    let lines: Vec<_> = output.lines().map(str::trim).collect();
    assert_eq!(lines, ["1. SCOTT.EMP (TABLE)", "2. SCOTT.V (VIEW)"]);
}
