//! The interactive REPL.
//!
//! SQL typed at the prompt is parsed into the REPL's [`Session`] and each
//! statement is echoed with its dependencies. Lines starting with `\` are
//! commands.

use crate::editor::{LineEditor, ReadResult, RustylineEditor, is_complete};
use crate::session::{Session, describe};
use crate::snapshot;
use schemaseq_foundation::{Error, ErrorKind, Result};
use schemaseq_sql::Statement;
use std::io::{self, Write};
use std::path::Path;

const HELP: &str = "\
Commands:
  \\order         Print the creation order of every object seen so far
  \\owner [NAME]  Show or set the owner for unqualified names
  \\save PATH     Save the owner and known objects to a file
  \\load PATH     Replace the owner and known objects from a file
  \\help          Show this help
  \\quit          Exit (Ctrl+D also exits)

Anything else is parsed as SQL. Statements end with `;`; PL/SQL units and
anonymous blocks end with a line holding only `/`.";

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Parsing state across inputs.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: Session::new(),
            show_banner: true,
            continuation_prompt: "  .. ".to_string(),
        }
    }

    /// Sets the session for this REPL.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Parses a script file into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn eval_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<Statement>> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            Error::new(ErrorKind::Io(format!(
                "failed to read file '{}': {e}",
                path.display()
            )))
        })?;
        self.session.eval(&source)
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(true);
        }
        if matches!(trimmed, "\\q" | "\\quit") {
            return Ok(false);
        }

        self.editor.add_history(&input);
        match self.eval(&input) {
            Ok(output) if !output.is_empty() => println!("{output}"),
            Ok(_) => {}
            Err(e) => print_error(&e),
        }
        Ok(true)
    }

    /// Reads lines until they form a complete statement or command.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let prompt = if first_line {
                self.prompt()
            } else {
                self.continuation_prompt.clone()
            };

            match self.editor.read_line(&prompt)? {
                ReadResult::Line(line) => {
                    if !first_line {
                        input.push('\n');
                    }
                    input.push_str(&line);
                    if is_complete(&input) {
                        return Ok(Some(input));
                    }
                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF in multi-line input".to_string(),
                    )));
                }
            }
        }
    }

    fn prompt(&self) -> String {
        format!("{}> ", self.session.owner().unwrap_or("sql").to_ascii_lowercase())
    }

    /// Evaluates one input, returning the text to print.
    ///
    /// # Errors
    ///
    /// Returns parse errors, sequencing errors, and command errors.
    pub fn eval(&mut self, input: &str) -> Result<String> {
        let trimmed = input.trim();
        if let Some(command) = trimmed.strip_prefix('\\') {
            return self.command(command);
        }

        let statements = self.session.eval(input)?;
        Ok(statements
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn command(&mut self, command: &str) -> Result<String> {
        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, Some(argument.trim())),
            None => (command, None),
        };

        match (name, argument) {
            ("help" | "h" | "?", _) => Ok(HELP.to_string()),
            ("order", _) => {
                let order = self.session.order()?;
                Ok(order
                    .iter()
                    .enumerate()
                    .map(|(i, key)| format!("{:>4}. {key}", i + 1))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            ("owner", None) => Ok(self
                .session
                .owner()
                .map_or_else(|| "No owner set.".to_string(), |owner| format!("Owner is {owner}."))),
            ("owner", Some(owner)) => {
                self.session.set_owner(Some(owner));
                Ok(format!("Owner set to {}.", owner.to_ascii_uppercase()))
            }
            ("save", Some(path)) => {
                let snapshot = self.session.snapshot();
                snapshot::save_to_file(&snapshot, path)?;
                Ok(format!("Saved {} objects to {path}.", snapshot.directory.len()))
            }
            ("load", Some(path)) => {
                let snapshot = snapshot::load_from_file(path)?;
                let count = snapshot.directory.len();
                self.session.restore(snapshot);
                Ok(format!("Loaded {count} objects from {path}."))
            }
            ("save" | "load", None) => Err(Error::new(ErrorKind::Internal(format!(
                "\\{name} requires a path"
            )))),
            _ => Err(Error::new(ErrorKind::Internal(format!(
                "unknown command: \\{name} (try \\help)"
            )))),
        }
    }
}

/// Prints an error to stderr.
fn print_error(error: &Error) {
    eprintln!("\x1b[31mError: {error}\x1b[0m");
}

/// Prints the welcome banner.
fn print_banner() {
    println!("\x1b[1;36mschemaseq\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
    println!("Type SQL to see its dependencies, \\help for commands, Ctrl+D to exit.\n");
    let _ = io::stdout().flush();
}
