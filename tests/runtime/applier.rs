//! Integration tests for applying scripts through an executor

use schemaseq_foundation::{Error, ErrorKind, Result};
use schemaseq_runtime::{ApplySummary, Executor, ScriptApplier};
use schemaseq_sql::{ErrorPolicy, GrammarKind, Statement, StatementKind};

/// Records what it is asked to do and fails on request.
#[derive(Default)]
struct RecordingExecutor {
    executed: Vec<String>,
    users: Vec<String>,
    reject: Option<&'static str>,
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, statement: &Statement) -> Result<u64> {
        if self.reject.is_some_and(|word| statement.sql.contains(word)) {
            return Err(Error::unsupported(format!("rejected {statement}")));
        }
        self.executed.push(statement.sql.clone());
        Ok(u64::from(statement.kind == StatementKind::Insert))
    }

    fn connect(&mut self, user: &str, _dsn: Option<&str>) -> Result<()> {
        self.users.push(user.to_string());
        Ok(())
    }
}

const SCRIPT: &str = "\
create table emp (id number);
insert into emp values (1);
connect hr/hr
create or replace package pkg as
  procedure run;
end;
/
insert into scott.emp values (2);
";

#[test]
fn statements_reach_the_executor_in_order() {
    let mut executor = RecordingExecutor::default();
    let summary = ScriptApplier::new()
        .with_owner("scott")
        .apply(SCRIPT, &mut executor)
        .unwrap();

    assert_eq!(
        summary,
        ApplySummary {
            executed: 5,
            skipped: 0,
            rows: 2
        }
    );
    assert_eq!(executor.users, ["HR"]);
    assert_eq!(executor.executed.len(), 4);
    assert!(executor.executed[2].starts_with("create or replace package pkg"));
    assert!(executor.executed[2].ends_with("end;"));
}

#[test]
fn executor_errors_carry_the_statement() {
    let mut executor = RecordingExecutor {
        reject: Some("package"),
        ..RecordingExecutor::default()
    };
    let err = ScriptApplier::new()
        .with_owner("scott")
        .apply(SCRIPT, &mut executor)
        .unwrap_err();
    let context = err.context.clone().unwrap();
    assert_eq!(context.name.as_deref(), Some("PKG"));
    assert_eq!(context.owner.as_deref(), Some("HR"));
    assert_eq!(context.line, Some(4));
    assert_eq!(executor.executed.len(), 2);
}

#[test]
fn skip_policy_continues_past_rejections() {
    let mut executor = RecordingExecutor {
        reject: Some("package"),
        ..RecordingExecutor::default()
    };
    let summary = ScriptApplier::new()
        .with_owner("scott")
        .with_policy(ErrorPolicy::SkipUnsupported)
        .apply(SCRIPT, &mut executor)
        .unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.executed, 4);
}

#[test]
fn parse_errors_stop_application() {
    let mut executor = RecordingExecutor::default();
    let err = ScriptApplier::new()
        .apply("create table a (id number);\ncreate package p as\n", &mut executor)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseFailure { .. }));
    assert_eq!(executor.executed, ["create table a (id number)"]);
}

#[test]
fn default_applier_is_structural() {
    let applier = ScriptApplier::default();
    assert_eq!(applier.config().grammar, GrammarKind::Structural);
    assert_eq!(applier.config().policy, ErrorPolicy::FailFast);
}
