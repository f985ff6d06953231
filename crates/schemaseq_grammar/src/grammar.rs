//! Compiled, immutable grammars.

use std::collections::HashMap;

use schemaseq_foundation::{Error, Result};
use tracing::debug;

use crate::engine::{Match, Matcher, failure_at};
use crate::notation::{Definition, Syntax, parse_notation};
use crate::rule::{Expr, Rule, RuleId};
use crate::tree::ParseTree;

/// A set of named rules compiled from notation text.
///
/// Grammars are immutable once compiled and can be shared freely between
/// threads and parsing sessions.
#[derive(Clone, Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    index: HashMap<String, RuleId>,
}

impl Grammar {
    /// Compiles notation text into a grammar.
    ///
    /// # Errors
    ///
    /// Returns a grammar error if the notation is malformed, a rule is
    /// defined twice, a rule references an undefined name, or a rule is
    /// left-recursive.
    #[allow(clippy::cast_possible_truncation)]
    pub fn compile(source: &str) -> Result<Self> {
        let definitions = parse_notation(source)?;

        let mut index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            if index.insert(def.name.clone(), RuleId(i as u32)).is_some() {
                return Err(Error::grammar(format!(
                    "{}:{}: rule `{}` is defined more than once",
                    def.span.line, def.span.column, def.name
                )));
            }
        }

        let rules = definitions
            .into_iter()
            .map(|def| -> Result<Rule> {
                let Definition {
                    name, mode, body, ..
                } = def;
                Ok(Rule {
                    expr: lower(body, &index)?,
                    name,
                    mode,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let grammar = Self { rules, index };
        grammar.check_left_recursion()?;
        debug!(rules = grammar.rules.len(), "compiled grammar");
        Ok(grammar)
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the grammar has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    /// Returns the name of a rule.
    #[must_use]
    pub fn rule_name(&self, id: RuleId) -> &str {
        &self.rules[id.index()].name
    }

    /// Returns a rule.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    /// Iterates over rule names in definition order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    fn start_rule(&self, start: &str) -> Result<RuleId> {
        self.rule_id(start)
            .ok_or_else(|| Error::unknown_production(start))
    }

    /// Matches `start` at `position` without requiring the whole input to
    /// be consumed.
    ///
    /// # Errors
    ///
    /// Returns an unknown production error if `start` is not defined, or a
    /// parse failure if a commit marker produced a hard failure.
    pub fn match_at<'a>(
        &'a self,
        start: &str,
        text: &'a str,
        position: usize,
    ) -> Result<Option<Match<'a>>> {
        let id = self.start_rule(start)?;
        Matcher::new(self, text).match_rule(id, position)
    }

    /// Parses the whole of `text` with the `start` rule.
    ///
    /// # Errors
    ///
    /// Returns an unknown production error if `start` is not defined, or a
    /// parse failure located at the furthest point the grammar reached when
    /// the text does not match or is not fully consumed.
    pub fn parse<'a>(&'a self, start: &str, text: &'a str) -> Result<ParseTree<'a>> {
        self.parse_at(start, text, 0)
    }

    /// Parses `text` from byte offset `position` to its end with the `start`
    /// rule.
    ///
    /// Node spans stay relative to the whole of `text`.
    ///
    /// # Errors
    ///
    /// As for [`Grammar::parse`].
    pub fn parse_at<'a>(
        &'a self,
        start: &str,
        text: &'a str,
        position: usize,
    ) -> Result<ParseTree<'a>> {
        let id = self.start_rule(start)?;
        let mut matcher = Matcher::new(self, text);
        match matcher.match_rule(id, position)? {
            Some(m) if m.end == text.len() => Ok(m.tree),
            Some(m) => {
                let furthest = matcher.furthest();
                if furthest.position > m.end {
                    Err(matcher.failure_error())
                } else {
                    let mut expected = if furthest.position == m.end {
                        furthest.expected.clone()
                    } else {
                        Vec::new()
                    };
                    expected.push("end of input".to_string());
                    Err(failure_at(text, m.end, expected))
                }
            }
            None => Err(matcher.failure_error()),
        }
    }

    fn nullable_table(&self) -> Vec<bool> {
        let mut table = vec![false; self.rules.len()];
        loop {
            let mut changed = false;
            for (i, rule) in self.rules.iter().enumerate() {
                if !table[i] && nullable(&rule.expr, &table) {
                    table[i] = true;
                    changed = true;
                }
            }
            if !changed {
                return table;
            }
        }
    }

    fn check_left_recursion(&self) -> Result<()> {
        let nullable_rules = self.nullable_table();
        let calls: Vec<Vec<RuleId>> = self
            .rules
            .iter()
            .map(|rule| {
                let mut out = Vec::new();
                left_calls(&rule.expr, &nullable_rules, &mut out);
                out
            })
            .collect();

        // 0 = unvisited, 1 = on the current path, 2 = done
        let mut state = vec![0u8; self.rules.len()];
        for start in 0..self.rules.len() {
            if state[start] != 0 {
                continue;
            }
            let mut stack = vec![(start, 0usize)];
            state[start] = 1;
            while let Some(top) = stack.last_mut() {
                let rule = top.0;
                if let Some(&callee) = calls[rule].get(top.1) {
                    top.1 += 1;
                    match state[callee.index()] {
                        0 => {
                            state[callee.index()] = 1;
                            stack.push((callee.index(), 0));
                        }
                        1 => {
                            return Err(Error::grammar(format!(
                                "rule `{}` is left-recursive",
                                self.rules[callee.index()].name
                            )));
                        }
                        _ => {}
                    }
                } else {
                    state[rule] = 2;
                    stack.pop();
                }
            }
        }
        Ok(())
    }
}

fn lower(syntax: Syntax, index: &HashMap<String, RuleId>) -> Result<Expr> {
    let lower_all = |items: Vec<Syntax>| {
        items
            .into_iter()
            .map(|item| lower(item, index))
            .collect::<Result<Vec<_>>>()
    };
    Ok(match syntax {
        Syntax::Literal {
            text,
            case_insensitive,
        } => Expr::Literal {
            text,
            case_insensitive,
        },
        Syntax::Class(class) => Expr::Class(class),
        Syntax::Any => Expr::Any,
        Syntax::Ref { name, span } => match index.get(&name) {
            Some(&id) => Expr::Rule(id),
            None => {
                return Err(Error::grammar(format!(
                    "{}:{}: undefined rule `{name}`",
                    span.line, span.column
                )));
            }
        },
        Syntax::Sequence(items) => Expr::Sequence(lower_all(items)?),
        Syntax::Choice(items) => Expr::Choice(lower_all(items)?),
        Syntax::Repeat { inner, min, max } => Expr::Repeat {
            expr: Box::new(lower(*inner, index)?),
            min,
            max,
        },
        Syntax::Lookahead(inner) => Expr::Lookahead(Box::new(lower(*inner, index)?)),
        Syntax::NotLookahead(inner) => Expr::NotLookahead(Box::new(lower(*inner, index)?)),
        Syntax::Commit => Expr::Commit,
    })
}

fn nullable(expr: &Expr, table: &[bool]) -> bool {
    match expr {
        Expr::Literal { text, .. } => text.is_empty(),
        Expr::Class(_) | Expr::Any => false,
        Expr::Rule(id) => table[id.index()],
        Expr::Sequence(items) => items.iter().all(|item| nullable(item, table)),
        Expr::Choice(items) => items.iter().any(|item| nullable(item, table)),
        Expr::Repeat { expr, min, .. } => *min == 0 || nullable(expr, table),
        Expr::Lookahead(_) | Expr::NotLookahead(_) | Expr::Commit => true,
    }
}

/// Collects the rules `expr` may invoke before consuming any input.
fn left_calls(expr: &Expr, table: &[bool], out: &mut Vec<RuleId>) {
    match expr {
        Expr::Rule(id) => out.push(*id),
        Expr::Sequence(items) => {
            for item in items {
                left_calls(item, table, out);
                if !nullable(item, table) {
                    break;
                }
            }
        }
        Expr::Choice(items) => {
            for item in items {
                left_calls(item, table, out);
            }
        }
        Expr::Repeat { expr, .. } | Expr::Lookahead(expr) | Expr::NotLookahead(expr) => {
            left_calls(expr, table, out);
        }
        Expr::Literal { .. } | Expr::Class(_) | Expr::Any | Expr::Commit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaseq_foundation::ErrorKind;

    fn grammar_message(source: &str) -> String {
        match Grammar::compile(source).unwrap_err().kind {
            ErrorKind::Grammar(message) => message,
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn rule_table() {
        let g = Grammar::compile("a = b ; b = 'x' ;").unwrap();
        assert_eq!(g.len(), 2);
        let b = g.rule_id("b").unwrap();
        assert_eq!(g.rule_name(b), "b");
        assert_eq!(g.rule_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(g.rule_id("c").is_none());
    }

    #[test]
    fn undefined_reference_fails() {
        let message = grammar_message("a = 'x' missing ;");
        assert!(message.contains("undefined rule `missing`"));
        assert!(message.starts_with("1:9"), "{message}");
    }

    #[test]
    fn duplicate_rule_fails() {
        let message = grammar_message("a = 'x' ;\na = 'y' ;");
        assert!(message.contains("more than once"));
    }

    #[test]
    fn left_recursion_fails() {
        let message = grammar_message("expr = expr '+' term / term ; term = [0-9] ;");
        assert!(message.contains("left-recursive"));
        let message = grammar_message("a = 'x'? b ; b = ' '* a ;");
        assert!(message.contains("left-recursive"));
        assert!(Grammar::compile("a = 'x' a / 'y' ;").is_ok());
    }

    #[test]
    fn parse_requires_full_input() {
        let g = Grammar::compile("word = [a-z]+ ;").unwrap();
        assert!(g.parse("word", "abc").is_ok());
        let err = g.parse("word", "abc1").unwrap_err();
        let ErrorKind::ParseFailure {
            position,
            expected,
            remaining,
            ..
        } = err.kind
        else {
            panic!("expected parse failure");
        };
        assert_eq!(position, 3);
        assert_eq!(remaining, "1");
        assert!(expected.contains(&"end of input".to_string()));
    }

    #[test]
    fn parse_reports_furthest_failure() {
        let g = Grammar::compile("s = 'select' ' ' [a-z]+ ';' / 'x' ;").unwrap();
        let err = g.parse("s", "select 12;").unwrap_err();
        let ErrorKind::ParseFailure {
            position, column, ..
        } = err.kind
        else {
            panic!("expected parse failure");
        };
        assert_eq!(position, 7);
        assert_eq!(column, 8);
    }

    #[test]
    fn unknown_production() {
        let g = Grammar::compile("a = 'x' ;").unwrap();
        let err = g.parse("nope", "x").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownProduction(ref name) if name == "nope"));
        assert!(g.match_at("nope", "x", 0).is_err());
    }
}
