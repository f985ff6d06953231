//! Line editor abstraction for the REPL.
//!
//! This module provides a trait-based abstraction over line editing libraries,
//! allowing the REPL to use rustyline while remaining swappable.

use crate::highlight::{KEYWORDS, SqlHighlighter};
use schemaseq_foundation::{Error, ErrorKind, Result};
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator as RLValidator};
use std::borrow::Cow;

/// REPL commands offered for completion.
pub const COMMANDS: &[&str] = &["\\help", "\\load", "\\order", "\\owner", "\\quit", "\\save"];

/// Result of reading a line from the editor.
#[derive(Debug)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
pub trait LineEditor {
    /// Read a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);
}

/// Returns true when `input` holds a whole statement or command.
///
/// Commands and `connect` lines end at the newline. PL/SQL units and
/// anonymous blocks end at a line holding only `/`; everything else ends
/// at a `;` outside a string literal.
#[must_use]
pub fn is_complete(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('\\') {
        return true;
    }
    if trimmed.chars().filter(|&c| c == '\'').count() % 2 == 1 {
        return false;
    }
    if trimmed.lines().last().is_some_and(|line| line.trim() == "/") {
        return true;
    }

    let mut words = trimmed
        .split(|c: char| c.is_whitespace() || c == '(')
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_uppercase);
    let unit = match words.next().as_deref() {
        Some("CONNECT") => return true,
        Some("DECLARE" | "BEGIN") => true,
        Some("CREATE") => words
            .find(|word| !matches!(word.as_str(), "OR" | "REPLACE" | "EDITIONABLE" | "NONEDITIONABLE"))
            .is_some_and(|word| {
                matches!(word.as_str(), "PACKAGE" | "PROCEDURE" | "FUNCTION" | "TRIGGER" | "TYPE")
            }),
        _ => false,
    };
    !unit && trimmed.ends_with(';')
}

/// Helper for rustyline that provides completion, hints, highlighting, and validation.
#[derive(Helper, Completer, Hinter, RLValidator)]
struct SqlHelper {
    #[rustyline(Completer)]
    completer: SqlCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    #[rustyline(Validator)]
    validator: StatementValidator,
    highlighter: SqlHighlighter,
}

impl Highlighter for SqlHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Completer for SQL keywords, REPL commands, and file paths.
struct SqlCompleter {
    file_completer: FilenameCompleter,
    words: Vec<String>,
}

impl SqlCompleter {
    fn new() -> Self {
        let words = COMMANDS
            .iter()
            .map(|command| (*command).to_string())
            .chain(KEYWORDS.iter().map(|keyword| keyword.to_ascii_lowercase()))
            .collect();
        Self {
            file_completer: FilenameCompleter::new(),
            words,
        }
    }
}

impl Completer for SqlCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Paths after \save and \load
        if line.starts_with("\\save ") || line.starts_with("\\load ") {
            return self.file_completer.complete(line, pos, ctx);
        }

        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace() || "(),;".contains(c))
            .map_or(0, |i| i + 1);
        let word = line[start..pos].to_ascii_lowercase();

        let candidates: Vec<Pair> = self
            .words
            .iter()
            .filter(|candidate| candidate.starts_with(&word))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();

        Ok((start, candidates))
    }
}

/// Keeps reading lines until a statement is complete.
#[derive(Default)]
struct StatementValidator;

impl Validator for StatementValidator {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if is_complete(ctx.input()) {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

/// Line editor implementation using rustyline.
pub struct RustylineEditor {
    editor: Editor<SqlHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a new rustyline-based editor.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline initialization fails.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(1000)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?
            .build();

        let helper = SqlHelper {
            completer: SqlCompleter::new(),
            hinter: HistoryHinter::new(),
            validator: StatementValidator,
            highlighter: SqlHighlighter::new(),
        };

        let mut editor = Editor::with_config(config)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?;
        editor.set_helper(Some(helper));

        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::new(ErrorKind::Io(e.to_string()))),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}
