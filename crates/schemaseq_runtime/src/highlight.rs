//! Syntax highlighting for the REPL.

use std::borrow::Cow;

/// Words shown as keywords.
pub(crate) const KEYWORDS: &[&str] = &[
    "ALTER", "AND", "AS", "BEGIN", "BODY", "BY", "CONNECT", "CONSTRAINT", "CREATE", "CURSOR",
    "DECLARE", "DELETE", "DROP", "ELSE", "ELSIF", "END", "EXCEPTION", "FOR", "FOREIGN", "FROM",
    "FUNCTION", "GRANT", "IF", "IN", "INDEX", "INSERT", "INTO", "IS", "JOIN", "KEY", "LOOP",
    "MERGE", "NOT", "NULL", "ON", "OR", "PACKAGE", "PRIMARY", "PROCEDURE", "REFERENCES",
    "REPLACE", "RETURN", "REVOKE", "SELECT", "SEQUENCE", "SET", "SYNONYM", "TABLE", "THEN",
    "TO", "TRIGGER", "TYPE", "UNIQUE", "UPDATE", "USING", "VALUES", "VIEW", "WHEN", "WHERE",
    "WITH",
];

/// Highlighter for SQL input.
pub struct SqlHighlighter {}

impl SqlHighlighter {
    /// Creates a new highlighter.
    pub const fn new() -> Self {
        Self {}
    }

    /// Highlight a line of input.
    #[allow(clippy::unused_self)]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim_start().starts_with('\\') {
            return Cow::Owned(format!("\x1b[36m{line}\x1b[0m"));
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                // Line comments run to the end
                '-' if chars.peek() == Some(&'-') => {
                    result.push_str("\x1b[2;3m"); // dim italic
                    result.push(c);
                    result.extend(chars.by_ref());
                    result.push_str("\x1b[0m");
                }

                // String literals; a doubled quote stays inside
                '\'' => {
                    result.push_str("\x1b[33m"); // yellow
                    result.push(c);
                    while let Some(next) = chars.next() {
                        result.push(next);
                        if next == '\'' {
                            if chars.peek() == Some(&'\'') {
                                result.extend(chars.next());
                            } else {
                                break;
                            }
                        }
                    }
                    result.push_str("\x1b[0m");
                }

                // Numbers
                c if c.is_ascii_digit() => {
                    result.push_str("\x1b[35m"); // magenta
                    result.push(c);
                    while let Some(next) = chars.next_if(|n| n.is_ascii_digit() || *n == '.') {
                        result.push(next);
                    }
                    result.push_str("\x1b[0m");
                }

                // Bind variables
                ':' if chars.peek().is_some_and(|n| n.is_alphabetic()) => {
                    result.push_str("\x1b[34m"); // blue
                    result.push(c);
                    while let Some(next) = chars.next_if(|n| n.is_alphanumeric() || *n == '_') {
                        result.push(next);
                    }
                    result.push_str("\x1b[0m");
                }

                c if c.is_alphabetic() => {
                    let mut word = String::from(c);
                    while let Some(next) =
                        chars.next_if(|n| n.is_alphanumeric() || matches!(n, '_' | '$' | '#'))
                    {
                        word.push(next);
                    }
                    if KEYWORDS.contains(&word.to_ascii_uppercase().as_str()) {
                        result.push_str("\x1b[1;32m"); // bold green
                        result.push_str(&word);
                        result.push_str("\x1b[0m");
                    } else {
                        result.push_str(&word);
                    }
                }

                _ => result.push(c),
            }
        }

        Cow::Owned(result)
    }
}

impl Default for SqlHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
