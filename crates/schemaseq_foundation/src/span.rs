//! Source location tracking.
//!
//! `Span` tracks the position of statements and parse nodes in source text
//! for error reporting and for recording where each statement started.

/// A span of source text.
///
/// Tracks byte offsets and the line/column of the start position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// 1-based line number where this span starts.
    pub line: u32,
    /// 1-based column number where this span starts.
    pub column: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Creates a span at the start of input.
    #[must_use]
    pub const fn at_start() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }

    /// Creates a span for `start..end` in `source`, computing the line and
    /// column of `start`.
    #[must_use]
    pub fn locate(source: &str, start: usize, end: usize) -> Self {
        let (line, column) = line_column(source, start);
        Self::new(start, end, line, column)
    }

    /// Creates a span covering the range from this span to another.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
        }
    }

    /// Returns the length of this span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the text this span covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or_default()
    }
}

/// Returns the 1-based line and column of a byte offset.
///
/// Offsets past the end of `source` are clamped. Columns count characters,
/// not bytes.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line as u32, column as u32)
}

/// Returns a short excerpt of `source` starting at `offset`, for diagnostics.
///
/// At most `max_chars` characters are returned; the excerpt stops at the end
/// of the line.
#[must_use]
pub fn excerpt(source: &str, offset: usize, max_chars: usize) -> String {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    source[offset..]
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(max_chars)
        .collect()
}
