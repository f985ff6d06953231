//! The PEG matching engine.
//!
//! Matching is ordered-choice backtracking over a compiled [`Grammar`]:
//!
//! - a choice commits to its first successful alternative
//! - repetition is greedy and never gives back input
//! - a repetition iteration that consumes nothing ends the repetition
//! - lookaheads never consume input
//! - after a `^` marker, a failure of the rest of the sequence is a hard
//!   [`ParseFailure`](schemaseq_foundation::ErrorKind::ParseFailure)
//!
//! The matcher records the furthest position at which a terminal failed,
//! together with what was expected there, for error reporting.

use schemaseq_foundation::{Error, Result, excerpt, line_column};

use crate::grammar::Grammar;
use crate::rule::{Expr, RuleId, RuleMode};
use crate::tree::{Node, NodeId, ParseTree};

/// Maximum number of expected-terminal descriptions kept for a failure.
pub const MAX_EXPECTED: usize = 8;

/// Number of characters of remaining input quoted in a failure.
const EXCERPT_CHARS: usize = 40;

/// A successful match of a start rule.
#[derive(Clone, Debug)]
pub struct Match<'a> {
    /// Byte offset just past the match.
    pub end: usize,
    /// The nodes produced by the match.
    pub tree: ParseTree<'a>,
}

/// The furthest failure seen by a matcher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Failure {
    /// Byte offset of the failure.
    pub position: usize,
    /// Descriptions of the terminals expected at `position`.
    pub expected: Vec<String>,
}

/// Matches rules of one grammar against one input text.
///
/// A matcher can be reused for several matches over the same text; each
/// call to [`Matcher::match_rule`] resets the furthest-failure record.
pub struct Matcher<'a> {
    grammar: &'a Grammar,
    text: &'a str,
    nodes: Vec<Node>,
    furthest: Failure,
    predicate_depth: u32,
}

impl<'a> Matcher<'a> {
    /// Creates a matcher for the given grammar and text.
    #[must_use]
    pub fn new(grammar: &'a Grammar, text: &'a str) -> Self {
        Self {
            grammar,
            text,
            nodes: Vec::new(),
            furthest: Failure::default(),
            predicate_depth: 0,
        }
    }

    /// Returns the furthest failure of the last match.
    #[must_use]
    pub fn furthest(&self) -> &Failure {
        &self.furthest
    }

    /// Builds a parse failure error located at the furthest failure.
    #[must_use]
    pub fn failure_error(&self) -> Error {
        failure_at(self.text, self.furthest.position, self.furthest.expected.clone())
    }

    /// Matches `rule` starting at byte offset `position`.
    ///
    /// Returns `Ok(None)` when the rule does not match; the furthest failure
    /// is then available through [`Matcher::furthest`].
    ///
    /// # Errors
    ///
    /// Returns a parse failure when a commit marker turned a failure into a
    /// hard failure.
    pub fn match_rule(&mut self, rule: RuleId, position: usize) -> Result<Option<Match<'a>>> {
        self.nodes.clear();
        self.furthest = Failure {
            position,
            expected: Vec::new(),
        };
        self.predicate_depth = 0;

        let mut roots = Vec::new();
        let end = self.match_expr(&Expr::Rule(rule), position, &mut roots)?;
        let nodes = std::mem::take(&mut self.nodes);
        Ok(end.map(|end| Match {
            end,
            tree: ParseTree::new(self.grammar, self.text, nodes, roots),
        }))
    }

    fn fail(&mut self, position: usize, expr: &Expr) {
        if self.predicate_depth > 0 {
            return;
        }
        if position > self.furthest.position {
            self.furthest.position = position;
            self.furthest.expected.clear();
        }
        if position == self.furthest.position && self.furthest.expected.len() < MAX_EXPECTED {
            let description = expr.describe();
            if !self.furthest.expected.contains(&description) {
                self.furthest.expected.push(description);
            }
        }
    }

    fn rewind(&mut self, out: &mut Vec<NodeId>, out_mark: usize, node_mark: usize) {
        out.truncate(out_mark);
        self.nodes.truncate(node_mark);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn match_expr(&mut self, expr: &Expr, pos: usize, out: &mut Vec<NodeId>) -> Result<Option<usize>> {
        let grammar = self.grammar;
        match expr {
            Expr::Literal {
                text,
                case_insensitive,
            } => {
                let end = pos + text.len();
                let matched = self.text.get(pos..end).is_some_and(|slice| {
                    if *case_insensitive {
                        slice.eq_ignore_ascii_case(text)
                    } else {
                        slice == text
                    }
                });
                if matched {
                    Ok(Some(end))
                } else {
                    self.fail(pos, expr);
                    Ok(None)
                }
            }
            Expr::Class(class) => match self.text.get(pos..).and_then(|rest| rest.chars().next()) {
                Some(c) if class.matches(c) => Ok(Some(pos + c.len_utf8())),
                _ => {
                    self.fail(pos, expr);
                    Ok(None)
                }
            },
            Expr::Any => match self.text.get(pos..).and_then(|rest| rest.chars().next()) {
                Some(c) => Ok(Some(pos + c.len_utf8())),
                None => {
                    self.fail(pos, expr);
                    Ok(None)
                }
            },
            Expr::Rule(id) => {
                let rule = grammar.rule(*id);
                let node_mark = self.nodes.len();
                let mut children = Vec::new();
                let Some(end) = self.match_expr(&rule.expr, pos, &mut children)? else {
                    self.nodes.truncate(node_mark);
                    return Ok(None);
                };
                match rule.mode {
                    RuleMode::Normal => {
                        let node_id = NodeId(self.nodes.len() as u32);
                        self.nodes.push(Node {
                            rule: *id,
                            start: pos,
                            end,
                            children,
                        });
                        out.push(node_id);
                    }
                    RuleMode::Silent => self.nodes.truncate(node_mark),
                    RuleMode::Transparent => out.extend(children),
                }
                Ok(Some(end))
            }
            Expr::Sequence(items) => {
                let out_mark = out.len();
                let node_mark = self.nodes.len();
                let mut committed = false;
                let mut cursor = pos;
                for item in items {
                    if *item == Expr::Commit {
                        committed = true;
                        continue;
                    }
                    match self.match_expr(item, cursor, out)? {
                        Some(next) => cursor = next,
                        None if committed => return Err(self.failure_error()),
                        None => {
                            self.rewind(out, out_mark, node_mark);
                            return Ok(None);
                        }
                    }
                }
                Ok(Some(cursor))
            }
            Expr::Choice(alternatives) => {
                let out_mark = out.len();
                let node_mark = self.nodes.len();
                for alternative in alternatives {
                    if let Some(end) = self.match_expr(alternative, pos, out)? {
                        return Ok(Some(end));
                    }
                    self.rewind(out, out_mark, node_mark);
                }
                Ok(None)
            }
            Expr::Repeat { expr: inner, min, max } => {
                let out_mark = out.len();
                let node_mark = self.nodes.len();
                let mut count = 0;
                let mut cursor = pos;
                while max.is_none_or(|max| count < max) {
                    let iteration_out = out.len();
                    let iteration_nodes = self.nodes.len();
                    match self.match_expr(inner, cursor, out)? {
                        Some(next) => {
                            count += 1;
                            let progressed = next > cursor;
                            cursor = next;
                            if !progressed {
                                break;
                            }
                        }
                        None => {
                            self.rewind(out, iteration_out, iteration_nodes);
                            break;
                        }
                    }
                }
                if count < *min {
                    self.rewind(out, out_mark, node_mark);
                    return Ok(None);
                }
                Ok(Some(cursor))
            }
            Expr::Lookahead(inner) | Expr::NotLookahead(inner) => {
                let out_mark = out.len();
                let node_mark = self.nodes.len();
                self.predicate_depth += 1;
                let result = self.match_expr(inner, pos, out);
                self.predicate_depth -= 1;
                self.rewind(out, out_mark, node_mark);
                let matched = result?.is_some();
                let positive = matches!(expr, Expr::Lookahead(_));
                Ok((matched == positive).then_some(pos))
            }
            Expr::Commit => Ok(Some(pos)),
        }
    }
}

/// Builds a parse failure for `text` at byte offset `position`.
#[must_use]
pub fn failure_at(text: &str, position: usize, expected: Vec<String>) -> Error {
    let (line, column) = line_column(text, position);
    Error::parse_failure(
        position,
        line,
        column,
        excerpt(text, position, EXCERPT_CHARS),
        expected,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaseq_foundation::ErrorKind;

    fn grammar(source: &str) -> Grammar {
        Grammar::compile(source).unwrap()
    }

    fn matches(g: &Grammar, rule: &str, text: &str) -> Option<usize> {
        g.match_at(rule, text, 0).unwrap().map(|m| m.end)
    }

    #[test]
    fn ordered_choice_takes_first_success() {
        let g = grammar("r = 'a' / 'ab' ;");
        assert_eq!(matches(&g, "r", "ab"), Some(1));
    }

    #[test]
    fn repetition_is_greedy_without_backtracking() {
        let g = grammar("r = 'a'* 'a' ;");
        assert_eq!(matches(&g, "r", "aaa"), None);
        let g = grammar("r = 'a'+ 'b' ;");
        assert_eq!(matches(&g, "r", "aaab"), Some(4));
    }

    #[test]
    fn zero_length_iteration_stops_repetition() {
        let g = grammar("r = ('a'?)* 'b' ;");
        assert_eq!(matches(&g, "r", "aab"), Some(3));
        assert_eq!(matches(&g, "r", "b"), Some(1));
    }

    #[test]
    fn case_insensitive_literal() {
        let g = grammar("r = i'select' ;");
        assert_eq!(matches(&g, "r", "SeLeCt"), Some(6));
        let g = grammar("r = 'select' ;");
        assert_eq!(matches(&g, "r", "SELECT"), None);
    }

    #[test]
    fn lookaheads_do_not_consume() {
        let g = grammar("r = &'a' [a-z] !'x' ;");
        assert_eq!(matches(&g, "r", "ab"), Some(1));
        assert_eq!(matches(&g, "r", "ax"), None);
        assert_eq!(matches(&g, "r", "ba"), None);
    }

    #[test]
    fn keyword_word_boundary() {
        let g = grammar("kw = i'end' ![A-Za-z0-9_] ;");
        assert_eq!(matches(&g, "kw", "end;"), Some(3));
        assert_eq!(matches(&g, "kw", "ending"), None);
    }

    #[test]
    fn any_matches_multibyte() {
        let g = grammar("r = . . ;");
        assert_eq!(matches(&g, "r", "é!"), Some(3));
        assert_eq!(matches(&g, "r", "é"), None);
    }

    #[test]
    fn commit_turns_failure_into_error() {
        let g = grammar(
            r"
            stmt = pkg / other ;
            pkg = 'package' ^ ' ' name ';' ;
            other = [a-z ]+ ;
            name = [a-z]+ ;
            ",
        );
        let err = g.match_at("stmt", "package 123;", 0).unwrap_err();
        let ErrorKind::ParseFailure { position, expected, .. } = err.kind else {
            panic!("expected parse failure");
        };
        assert_eq!(position, 8);
        assert!(expected.contains(&"[a-z]".to_string()));

        let g = grammar(
            r"
            stmt = pkg / other ;
            pkg = 'package' ' ' name ';' ;
            other = [a-z0-9 ]+ ;
            name = [a-z]+ ;
            ",
        );
        assert_eq!(matches(&g, "stmt", "package 123"), Some(11));
    }

    #[test]
    fn commit_before_marker_still_backtracks() {
        let g = grammar("r = 'a' 'b' ^ 'c' / 'a' 'x' ;");
        assert_eq!(matches(&g, "r", "ax"), Some(2));
        assert!(g.match_at("r", "abx", 0).is_err());
    }

    #[test]
    fn furthest_failure_is_tracked() {
        let g = grammar("r = 'ab' 'c' / 'a' 'd' ;");
        let mut matcher = Matcher::new(&g, "abx");
        let id = g.rule_id("r").unwrap();
        assert!(matcher.match_rule(id, 0).unwrap().is_none());
        assert_eq!(matcher.furthest().position, 2);
        assert_eq!(matcher.furthest().expected, vec!["'c'".to_string()]);
    }

    #[test]
    fn expected_list_is_capped() {
        let g = grammar("r = 'a' / 'b' / 'c' / 'd' / 'e' / 'f' / 'g' / 'h' / 'i' / 'j' ;");
        let mut matcher = Matcher::new(&g, "z");
        let id = g.rule_id("r").unwrap();
        assert!(matcher.match_rule(id, 0).unwrap().is_none());
        assert_eq!(matcher.furthest().expected.len(), MAX_EXPECTED);
    }

    #[test]
    fn failed_alternatives_leave_no_nodes() {
        let g = grammar(
            r"
            r = a 'x' / b ;
            a = 'q' ;
            b = 'q' ;
            ",
        );
        let m = g.match_at("r", "q", 0).unwrap().unwrap();
        let tree = m.tree;
        let root = tree.root().unwrap();
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.rule_name(tree.children(root)[0]), "b");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn silent_and_transparent_rules() {
        let g = grammar(
            r"
            r = ws word ws wrap ;
            silent ws = ' '* ;
            transparent wrap = '(' word ')' ;
            word = [a-z]+ ;
            ",
        );
        let m = g.match_at("r", " ab (cd)", 0).unwrap().unwrap();
        let tree = m.tree;
        let root = tree.root().unwrap();
        let names: Vec<_> = tree.children(root).iter().map(|&c| tree.rule_name(c)).collect();
        assert_eq!(names, vec!["word", "word"]);
    }

    #[test]
    fn match_at_offset() {
        let g = grammar("word = [a-z]+ ;");
        let m = g.match_at("word", "12abc", 2).unwrap().unwrap();
        assert_eq!(m.end, 5);
        assert_eq!(m.tree.text(m.tree.root().unwrap()), "abc");
    }
}
