//! Source location utilities for converting byte offsets to line/column positions
//!
//! Tokens carry byte ranges; errors report line/column positions. This is the
//! bridge between the two.

use super::span::{Position, Span};
use std::ops::Range;

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Position::new(line, column)
    }

    /// Convert a byte range to a span
    pub fn range_to_span(&self, range: &Range<usize>) -> Span {
        Span::new(
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
