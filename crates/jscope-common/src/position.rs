//! Line/column positions derived from byte offsets.

use serde::Serialize;

/// A zero-based line/column pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }
}

/// Precomputed line-start table for a source text.
///
/// Built once per file; `position_of` then resolves any byte offset with a
/// binary search over the line starts.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> LineMap {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        LineMap { line_starts }
    }

    /// Resolve a byte offset to a zero-based line/column position.
    pub fn position_of(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        Position {
            line: line as u32,
            column: offset - self.line_starts[line],
        }
    }
}
