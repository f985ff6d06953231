//! Lexer and parser for the textual grammar notation.
//!
//! ```text
//! # comment
//! name             = expr ;
//! silent name      = expr ;
//! transparent name = expr ;
//! ```
//!
//! Expressions are built from `'lit'`, `i'lit'`, `[class]`, `.`, rule
//! names, juxtaposition (sequence), `/` (ordered choice), the suffixes
//! `* + ?`, the prefixes `& !`, the commit marker `^`, and parentheses.

use schemaseq_foundation::{Error, Result, Span};

use crate::rule::{CharClass, RuleMode};

/// A rule definition with unresolved references.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Definition {
    pub name: String,
    pub mode: RuleMode,
    pub body: Syntax,
    pub span: Span,
}

/// A parsing expression as written, before rule names are resolved.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Syntax {
    Literal { text: String, case_insensitive: bool },
    Class(CharClass),
    Any,
    Ref { name: String, span: Span },
    Sequence(Vec<Syntax>),
    Choice(Vec<Syntax>),
    Repeat { inner: Box<Syntax>, min: u32, max: Option<u32> },
    Lookahead(Box<Syntax>),
    NotLookahead(Box<Syntax>),
    Commit,
}

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
    Name(String),
    Literal { text: String, case_insensitive: bool },
    Class(CharClass),
    Dot,
    Equals,
    Semicolon,
    Slash,
    Star,
    Plus,
    Question,
    Amp,
    Bang,
    Caret,
    LParen,
    RParen,
    Eof,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            Self::Name(name) => format!("name `{name}`"),
            Self::Literal { .. } => "literal".to_string(),
            Self::Class(_) => "character class".to_string(),
            Self::Dot => "`.`".to_string(),
            Self::Equals => "`=`".to_string(),
            Self::Semicolon => "`;`".to_string(),
            Self::Slash => "`/`".to_string(),
            Self::Star => "`*`".to_string(),
            Self::Plus => "`+`".to_string(),
            Self::Question => "`?`".to_string(),
            Self::Amp => "`&`".to_string(),
            Self::Bang => "`!`".to_string(),
            Self::Caret => "`^`".to_string(),
            Self::LParen => "`(`".to_string(),
            Self::RParen => "`)`".to_string(),
            Self::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Token {
    kind: TokenKind,
    span: Span,
}

fn error_at(span: Span, message: impl std::fmt::Display) -> Error {
    Error::grammar(format!("{}:{}: {message}", span.line, span.column))
}

/// Tokenizer for the notation.
struct Lexer<'src> {
    rest: &'src str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        let len = c.len_utf8();
        self.rest = &self.rest[len..];
        self.position += len;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn here(&self) -> Span {
        Span::new(self.position, self.position, self.line, self.column)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '#' {
                while let Some(c) = self.peek_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();
        let start = self.here();
        let Some(c) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: start,
            });
        };

        let kind = match c {
            '=' => self.single(TokenKind::Equals),
            ';' => self.single(TokenKind::Semicolon),
            '/' => self.single(TokenKind::Slash),
            '*' => self.single(TokenKind::Star),
            '+' => self.single(TokenKind::Plus),
            '?' => self.single(TokenKind::Question),
            '&' => self.single(TokenKind::Amp),
            '!' => self.single(TokenKind::Bang),
            '^' => self.single(TokenKind::Caret),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '.' => self.single(TokenKind::Dot),
            '\'' => self.scan_literal(false, start)?,
            '[' => self.scan_class(start)?,
            'i' if self.peek_char_n(1) == Some('\'') => {
                self.advance(); // consume 'i'
                self.scan_literal(true, start)?
            }
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_name(),
            c => return Err(error_at(start, format!("unexpected character `{c}`"))),
        };

        Ok(Token {
            kind,
            span: Span::new(start.start, self.position, start.line, start.column),
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn scan_name(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Name(name)
    }

    fn scan_escape(&mut self, start: Span) -> Result<char> {
        match self.advance() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some(c @ ('\\' | '\'' | ']' | '[' | '^' | '-')) => Ok(c),
            Some(c) => Err(error_at(start, format!("invalid escape sequence `\\{c}`"))),
            None => Err(error_at(start, "unexpected end of input in escape")),
        }
    }

    fn scan_literal(&mut self, case_insensitive: bool, start: Span) -> Result<TokenKind> {
        self.advance(); // consume opening quote
        let mut text = String::new();
        loop {
            match self.advance() {
                Some('\'') => break,
                Some('\\') => text.push(self.scan_escape(start)?),
                Some(c) => text.push(c),
                None => return Err(error_at(start, "unterminated literal")),
            }
        }
        if text.is_empty() {
            return Err(error_at(start, "empty literal"));
        }
        Ok(TokenKind::Literal {
            text,
            case_insensitive,
        })
    }

    fn scan_class_char(&mut self, start: Span) -> Result<char> {
        match self.advance() {
            Some('\\') => self.scan_escape(start),
            Some(c) => Ok(c),
            None => Err(error_at(start, "unterminated character class")),
        }
    }

    fn scan_class(&mut self, start: Span) -> Result<TokenKind> {
        self.advance(); // consume '['
        let negated = if self.peek_char() == Some('^') {
            self.advance();
            true
        } else {
            false
        };
        let mut ranges = Vec::new();
        loop {
            match self.peek_char() {
                Some(']') => {
                    self.advance();
                    break;
                }
                None => return Err(error_at(start, "unterminated character class")),
                Some(_) => {
                    let lo = self.scan_class_char(start)?;
                    if self.peek_char() == Some('-') && !matches!(self.peek_char_n(1), Some(']') | None)
                    {
                        self.advance(); // consume '-'
                        let hi = self.scan_class_char(start)?;
                        if hi < lo {
                            return Err(error_at(start, format!("invalid range `{lo}-{hi}`")));
                        }
                        ranges.push((lo, hi));
                    } else {
                        ranges.push((lo, lo));
                    }
                }
            }
        }
        if ranges.is_empty() {
            return Err(error_at(start, "empty character class"));
        }
        Ok(TokenKind::Class(CharClass::new(ranges, negated)))
    }
}

/// Recursive-descent parser over the token list.
struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        // The token list always ends with Eof and the parser never moves past it.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[(self.index + 1).min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        let token = self.current();
        if &token.kind == kind {
            Ok(self.advance())
        } else {
            Err(error_at(
                token.span,
                format!("expected {}, found {}", kind.describe(), token.kind.describe()),
            ))
        }
    }

    fn parse_definitions(&mut self) -> Result<Vec<Definition>> {
        let mut definitions = Vec::new();
        while self.current().kind != TokenKind::Eof {
            definitions.push(self.parse_definition()?);
        }
        Ok(definitions)
    }

    fn parse_definition(&mut self) -> Result<Definition> {
        let first = self.advance();
        let first_name = match first.kind {
            TokenKind::Name(name) => name,
            other => {
                return Err(error_at(
                    first.span,
                    format!("expected rule name, found {}", other.describe()),
                ));
            }
        };

        let mode = match (first_name.as_str(), &self.current().kind) {
            ("silent", TokenKind::Name(_)) => RuleMode::Silent,
            ("transparent", TokenKind::Name(_)) => RuleMode::Transparent,
            _ => RuleMode::Normal,
        };
        let name = match self.current().kind.clone() {
            TokenKind::Name(name) if mode != RuleMode::Normal => {
                self.advance();
                name
            }
            _ => first_name,
        };

        self.expect(&TokenKind::Equals)?;
        let body = self.parse_choice()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Definition {
            name,
            mode,
            body,
            span: first.span,
        })
    }

    fn parse_choice(&mut self) -> Result<Syntax> {
        let mut alternatives = vec![self.parse_sequence()?];
        while self.current().kind == TokenKind::Slash {
            self.advance();
            alternatives.push(self.parse_sequence()?);
        }
        Ok(if alternatives.len() == 1 {
            alternatives.swap_remove(0)
        } else {
            Syntax::Choice(alternatives)
        })
    }

    fn parse_sequence(&mut self) -> Result<Syntax> {
        let mut items = Vec::new();
        loop {
            match &self.current().kind {
                TokenKind::Slash | TokenKind::RParen | TokenKind::Semicolon | TokenKind::Eof => {
                    break;
                }
                TokenKind::Name(_) if *self.peek() == TokenKind::Equals => {
                    let span = self.current().span;
                    return Err(error_at(span, "missing `;` before rule definition"));
                }
                TokenKind::Caret => {
                    self.advance();
                    items.push(Syntax::Commit);
                }
                _ => items.push(self.parse_prefixed()?),
            }
        }
        match items.len() {
            0 => {
                let token = self.current();
                Err(error_at(
                    token.span,
                    format!("expected expression, found {}", token.kind.describe()),
                ))
            }
            1 if items[0] != Syntax::Commit => Ok(items.swap_remove(0)),
            _ => Ok(Syntax::Sequence(items)),
        }
    }

    fn parse_prefixed(&mut self) -> Result<Syntax> {
        match self.current().kind {
            TokenKind::Amp => {
                self.advance();
                Ok(Syntax::Lookahead(Box::new(self.parse_suffixed()?)))
            }
            TokenKind::Bang => {
                self.advance();
                Ok(Syntax::NotLookahead(Box::new(self.parse_suffixed()?)))
            }
            _ => self.parse_suffixed(),
        }
    }

    fn parse_suffixed(&mut self) -> Result<Syntax> {
        let mut expr = self.parse_primary()?;
        loop {
            let (min, max) = match self.current().kind {
                TokenKind::Star => (0, None),
                TokenKind::Plus => (1, None),
                TokenKind::Question => (0, Some(1)),
                _ => return Ok(expr),
            };
            self.advance();
            expr = Syntax::Repeat {
                inner: Box::new(expr),
                min,
                max,
            };
        }
    }

    fn parse_primary(&mut self) -> Result<Syntax> {
        let token = self.advance();
        match token.kind {
            TokenKind::Name(name) => Ok(Syntax::Ref {
                name,
                span: token.span,
            }),
            TokenKind::Literal {
                text,
                case_insensitive,
            } => Ok(Syntax::Literal {
                text,
                case_insensitive,
            }),
            TokenKind::Class(class) => Ok(Syntax::Class(class)),
            TokenKind::Dot => Ok(Syntax::Any),
            TokenKind::LParen => {
                let inner = self.parse_choice()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            other => Err(error_at(
                token.span,
                format!("expected expression, found {}", other.describe()),
            )),
        }
    }
}

/// Parses notation text into rule definitions.
///
/// # Errors
///
/// Returns a grammar error carrying the line and column of the first
/// lexical or syntactic problem.
pub(crate) fn parse_notation(source: &str) -> Result<Vec<Definition>> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser { tokens, index: 0 }.parse_definitions()
}
