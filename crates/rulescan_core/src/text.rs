//! Source position and range types.
//!
//! The scanner walks its input as a sequence of `char`s, so every offset in
//! this module is a char index, not a byte offset.

use std::fmt;

/// A position in source text, measured in chars from the start.
///
/// Offsets are 32-bit; inputs longer than `u32::MAX` chars report clamped
/// offsets and columns.
pub type TextPos = u32;

/// Convert a char index into a [`TextPos`], saturating at `TextPos::MAX`.
#[inline]
pub fn text_pos(offset: usize) -> TextPos {
    TextPos::try_from(offset).unwrap_or(TextPos::MAX)
}

/// A half-open range of char offsets covered by a token.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextRange {
    /// The char offset where this range starts (inclusive).
    pub pos: TextPos,
    /// The char offset where this range ends (exclusive).
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos);
        Self { pos, end }
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

/// A 1-based line and column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LinePos {
    pub line: u32,
    pub column: u32,
}

impl LinePos {
    /// The position of the first char of any input.
    pub const START: LinePos = LinePos { line: 1, column: 1 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Advance past a recognized line break.
    #[inline]
    pub fn next_line(&mut self) {
        self.line = self.line.saturating_add(1);
        self.column = 1;
    }

    /// Advance the column by `count` chars on the current line.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.column = self.column.saturating_add(text_pos(count));
    }
}

impl Default for LinePos {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for LinePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
