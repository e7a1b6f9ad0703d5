//! Source positions for diagnostics.

use std::fmt;

/// A single position in a body of text.
///
/// Line, column and offset all start at 1. The column counts characters,
/// the offset counts bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextLocation {
    /// Line number (1-based).
    pub line: u64,
    /// Column number in characters (1-based).
    pub column: u64,
    /// Absolute byte offset into the source (1-based).
    pub offset: u64,
}

impl TextLocation {
    /// Create a new TextLocation.
    pub fn new(line: u64, column: u64, offset: u64) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}, offset {}",
            self.line, self.column, self.offset
        )
    }
}

/// A value paired with the location it was defined at.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    value: T,
    location: TextLocation,
}

impl<T> Located<T> {
    pub fn new(value: T, location: TextLocation) -> Self {
        Self { value, location }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn location(&self) -> TextLocation {
        self.location
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// Maps byte offsets in a document to [`TextLocation`]s.
///
/// Line starts are computed once up front; lookups binary search them.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// Location of the byte at `offset` (0-based). Offsets past the end clamp
    /// to the end of the text.
    pub fn location_of(&self, offset: usize) -> TextLocation {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .text
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);

        TextLocation::new(line as u64 + 1, column as u64 + 1, offset as u64 + 1)
    }
}
