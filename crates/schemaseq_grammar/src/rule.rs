//! Compiled grammar rules.
//!
//! A [`Rule`] pairs a name and a [`RuleMode`] with an [`Expr`] tree whose
//! rule references have already been resolved to [`RuleId`]s.

use std::fmt;

/// Index of a rule inside its [`Grammar`](crate::Grammar).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a successful rule match shows up in the parse tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuleMode {
    /// The match produces a node holding its children.
    #[default]
    Normal,
    /// The match produces nothing, including its subtree.
    Silent,
    /// The match produces no node of its own; its children are spliced
    /// into the parent.
    Transparent,
}

/// A named grammar rule.
#[derive(Clone, Debug)]
pub struct Rule {
    /// Rule name as written in the notation.
    pub name: String,
    /// Tree contribution mode.
    pub mode: RuleMode,
    /// Body of the rule.
    pub expr: Expr,
}

/// A parsing expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A literal string.
    Literal {
        /// Text to match.
        text: String,
        /// Whether ASCII case is ignored.
        case_insensitive: bool,
    },
    /// A single character from a class.
    Class(CharClass),
    /// Any single character.
    Any,
    /// A reference to another rule.
    Rule(RuleId),
    /// All elements in order.
    Sequence(Vec<Expr>),
    /// The first alternative that matches.
    Choice(Vec<Expr>),
    /// Greedy repetition between `min` and `max` times.
    Repeat {
        /// Repeated expression.
        expr: Box<Expr>,
        /// Minimum number of iterations.
        min: u32,
        /// Maximum number of iterations, if bounded.
        max: Option<u32>,
    },
    /// Succeeds without consuming if the inner expression matches.
    Lookahead(Box<Expr>),
    /// Succeeds without consuming if the inner expression does not match.
    NotLookahead(Box<Expr>),
    /// Turns later failures of the enclosing sequence into hard failures.
    Commit,
}

impl Expr {
    /// `expr*`
    #[must_use]
    pub fn zero_or_more(expr: Self) -> Self {
        Self::Repeat {
            expr: Box::new(expr),
            min: 0,
            max: None,
        }
    }

    /// `expr+`
    #[must_use]
    pub fn one_or_more(expr: Self) -> Self {
        Self::Repeat {
            expr: Box::new(expr),
            min: 1,
            max: None,
        }
    }

    /// `expr?`
    #[must_use]
    pub fn optional(expr: Self) -> Self {
        Self::Repeat {
            expr: Box::new(expr),
            min: 0,
            max: Some(1),
        }
    }

    /// Human-readable description used in failure reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Literal {
                text,
                case_insensitive: true,
            } => format!("i'{}'", escape(text)),
            Self::Literal { text, .. } => format!("'{}'", escape(text)),
            Self::Class(class) => class.to_string(),
            Self::Any => "any character".to_string(),
            _ => "expression".to_string(),
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

/// A character class such as `[A-Za-z_]` or `[^"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharClass {
    /// Inclusive character ranges; single characters are `(c, c)`.
    pub ranges: Vec<(char, char)>,
    /// Whether the class matches characters outside the ranges.
    pub negated: bool,
}

impl CharClass {
    /// Creates a class from inclusive ranges.
    #[must_use]
    pub fn new(ranges: Vec<(char, char)>, negated: bool) -> Self {
        Self { ranges, negated }
    }

    /// Returns true if `c` belongs to the class.
    #[must_use]
    pub fn matches(&self, c: char) -> bool {
        let inside = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        inside != self.negated
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.negated {
            f.write_str("^")?;
        }
        for &(lo, hi) in &self.ranges {
            write!(f, "{}", escape_class(lo))?;
            if lo != hi {
                write!(f, "-{}", escape_class(hi))?;
            }
        }
        f.write_str("]")
    }
}

fn escape_class(c: char) -> String {
    match c {
        ']' | '\\' | '^' | '-' => format!("\\{c}"),
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        c => c.to_string(),
    }
}
