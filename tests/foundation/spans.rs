//! Integration tests for source locations

use schemaseq_foundation::{Span, excerpt, line_column};

#[test]
fn locate_computes_line_and_column() {
    let source = "create table a (id number);\n  create view v as select 1 x from dual;";
    let start = source.find("create view").unwrap();
    let span = Span::locate(source, start, source.len());
    assert_eq!((span.line, span.column), (2, 3));
    assert!(span.text(source).starts_with("create view"));
}

#[test]
fn columns_count_characters() {
    assert_eq!(line_column("-- é\nx", 6), (2, 1));
    assert_eq!(line_column("é x", 3), (1, 3));
}

#[test]
fn offsets_past_the_end_are_clamped() {
    assert_eq!(line_column("ab\ncd", 100), (2, 3));
}

#[test]
fn excerpt_stops_at_line_end() {
    assert_eq!(excerpt("abc\ndef", 1, 10), "bc");
    assert_eq!(excerpt("abcdef", 0, 3), "abc");
}

#[test]
fn span_join() {
    let a = Span::new(0, 4, 1, 1);
    let b = Span::new(10, 14, 2, 3);
    let joined = a.to(b);
    assert_eq!((joined.start, joined.end, joined.line), (0, 14, 1));
    assert_eq!(joined.len(), 14);
}
