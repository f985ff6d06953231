//! Integration tests for script rendering and statement metadata

use schemaseq_foundation::ObjectKind;
use schemaseq_sql::{GrammarKind, Statement, StatementKind, parse};

const SCRIPT: &str = "\
create table dept (id number primary key);
create table emp (id number, dept_id number);
alter table emp add constraint emp_dept_fk foreign key (dept_id) references dept (id);
create index emp_ix on emp (dept_id);
create or replace view emp_v as select e.id, d.id dept_key from emp e join dept d on d.id = e.dept_id;
create or replace procedure bump (p_id in number) is
begin
  update emp set dept_id = dept_id + 1 where id = p_id;
end bump;
/
insert into dept values (1);
commit;
";

fn summary(statements: &[Statement]) -> Vec<(StatementKind, Option<String>, usize)> {
    statements
        .iter()
        .map(|s| (s.kind, s.name.clone(), s.dependencies.len()))
        .collect()
}

#[test]
fn rendered_script_parses_the_same() {
    for grammar in [GrammarKind::Structural, GrammarKind::Full] {
        let first = parse(SCRIPT, grammar, "file", Some("scott")).unwrap();
        let rendered = first
            .iter()
            .map(Statement::to_script)
            .collect::<Vec<_>>()
            .join("\n");
        let second = parse(&rendered, grammar, "file", Some("scott")).unwrap();
        assert_eq!(summary(&first), summary(&second), "{grammar}");
        assert_eq!(
            first.iter().map(|s| &s.dependencies).collect::<Vec<_>>(),
            second.iter().map(|s| &s.dependencies).collect::<Vec<_>>()
        );
    }
}

#[test]
fn statements_record_lines() {
    let statements = parse(SCRIPT, GrammarKind::Full, "file", Some("scott")).unwrap();
    let lines: Vec<_> = statements.iter().map(|s| s.line).collect();
    assert_eq!(lines, [1, 2, 3, 4, 5, 6, 11, 12]);
}

#[test]
fn kinds_and_messages() {
    let statements = parse(SCRIPT, GrammarKind::Full, "file", Some("scott")).unwrap();
    assert_eq!(statements[2].kind, StatementKind::Create(ObjectKind::ForeignKey));
    assert_eq!(
        statements[2].log_message().as_deref(),
        Some("Foreign key SCOTT.EMP_DEPT_FK created.")
    );
    assert_eq!(statements[5].kind, StatementKind::Create(ObjectKind::Procedure));
    assert!(statements[5].to_script().ends_with("end bump;\n/"));
    assert_eq!(statements[6].kind, StatementKind::Insert);
    assert_eq!(
        statements[6].rows_message(1).as_deref(),
        Some("Inserted 1 row(s) in SCOTT.DEPT.")
    );
    assert_eq!(statements[7].kind, StatementKind::Commit);
    assert_eq!(statements[7].to_script(), "commit;");
}

#[test]
fn display_names_the_statement() {
    let statements = parse(SCRIPT, GrammarKind::Structural, "file", Some("scott")).unwrap();
    assert_eq!(statements[3].to_string(), "CREATE INDEX SCOTT.EMP_IX (line 4)");
}
