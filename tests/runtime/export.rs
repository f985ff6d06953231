//! Integration tests for catalog export ordering

use std::collections::BTreeSet;

use schemaseq_foundation::{ErrorKind, ObjectKey, ObjectKind, Result};
use schemaseq_runtime::{
    Catalog, Executor, MemoryCatalog, ScriptApplier, Session, export_order, order_statements,
    source_dependencies,
};
use schemaseq_sql::{ParserConfig, Statement};

const SCRIPT: &str = "\
create table dept (id number primary key);
create table emp (id number, dept_id number);
create index emp_ix on emp (dept_id);
connect hr/hr
create or replace view emp_v as select e.id from scott.emp e join scott.dept d on d.id = e.dept_id;
create or replace procedure report is
  n number;
begin
  select count(*) into n from emp_v;
end report;
/
";

fn parsed() -> Vec<Statement> {
    let mut session = Session::with_config(ParserConfig::default().with_owner("scott"));
    session.eval(SCRIPT).unwrap();
    session.statements().to_vec()
}

fn position(order: &[ObjectKey], key: &ObjectKey) -> usize {
    order.iter().position(|k| k == key).unwrap()
}

fn edge_set(catalog: &MemoryCatalog) -> BTreeSet<(ObjectKey, ObjectKey)> {
    catalog
        .dependencies()
        .unwrap()
        .into_iter()
        .map(|edge| (edge.from, edge.to))
        .collect()
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn export_places_dependencies_first() {
    let catalog = MemoryCatalog::from_statements(&parsed());
    let order = export_order(&catalog).unwrap();
    assert_eq!(order.len(), 5);

    for (from, to) in edge_set(&catalog) {
        assert!(position(&order, &to) < position(&order, &from), "{from} before {to}");
    }
}

#[test]
fn export_matches_statement_order() {
    let statements = parsed();
    let catalog = MemoryCatalog::from_statements(&statements);
    assert_eq!(export_order(&catalog).unwrap(), order_statements(&statements).unwrap());
}

#[test]
fn cross_owner_edges_are_kept() {
    let catalog = MemoryCatalog::from_statements(&parsed());
    let edges = edge_set(&catalog);
    let view = ObjectKey::new("HR", "EMP_V", ObjectKind::View);
    assert!(edges.contains(&(view.clone(), ObjectKey::new("SCOTT", "EMP", ObjectKind::Table))));
    assert!(edges.contains(&(
        ObjectKey::new("HR", "REPORT", ObjectKind::Procedure),
        view
    )));
}

#[test]
fn cyclic_catalogs_fail() {
    let a = ObjectKey::new("SCOTT", "A", ObjectKind::View);
    let b = ObjectKey::new("HR", "B", ObjectKind::View);
    let catalog = MemoryCatalog::new()
        .with_dependency(a.clone(), b.clone())
        .with_dependency(b.clone(), a.clone())
        .with_object(a)
        .with_object(b);
    let err = export_order(&catalog).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CycleDetected { .. }));
}

// =============================================================================
// Source Parsing
// =============================================================================

#[test]
fn sources_reproduce_recorded_edges() {
    let recorded = MemoryCatalog::from_statements(&parsed());
    let keys = recorded.objects().unwrap();

    let mut bare = MemoryCatalog::new();
    for key in &keys {
        let source = recorded.source(key).unwrap().unwrap();
        bare = bare.with_source(key.clone(), source);
    }

    let derived: BTreeSet<_> = source_dependencies(&bare, &keys)
        .unwrap()
        .into_iter()
        .map(|edge| (edge.from, edge.to))
        .collect();
    assert_eq!(derived, edge_set(&recorded));
}

// =============================================================================
// Replaying an Export
// =============================================================================

#[derive(Default)]
struct Collect(Vec<String>);

impl Executor for Collect {
    fn execute(&mut self, statement: &Statement) -> Result<u64> {
        self.0.push(statement.sql.clone());
        Ok(0)
    }
}

#[test]
fn exported_sources_apply_in_order() {
    let catalog = MemoryCatalog::from_statements(&parsed());
    let mut executor = Collect::default();
    let mut executed = 0;
    for key in export_order(&catalog).unwrap() {
        let source = catalog.source(&key).unwrap().unwrap();
        let summary = ScriptApplier::new()
            .with_owner(key.owner.clone())
            .apply(&source, &mut executor)
            .unwrap();
        executed += summary.executed;
    }
    assert_eq!(executed, 5);
    assert!(executor.0[0].starts_with("create table dept"));
    assert!(executor.0[4].starts_with("create or replace procedure report"));
}
