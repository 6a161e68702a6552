use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of a token.
///
/// `offset` is a 0-based byte offset; `line` and `column` are 1-based.
/// The column counts bytes since the last newline, so it is only a
/// character column for ASCII lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The position of the first byte of a buffer.
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Holds a program's raw bytes for scanning and error reporting.
///
/// The bytes are not validated here: the lexer decodes them lazily and
/// reports invalid encodings at the position where they occur.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Cached line start byte offsets for fast line lookup.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file from raw bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let line_starts = std::iter::once(0)
            .chain(
                bytes
                    .iter()
                    .enumerate()
                    .filter(|(_, &b)| b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        Self {
            name: name.into(),
            bytes,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected, since the
    /// line is only used for diagnostics. Returns `None` if the line number
    /// is out of range.
    pub fn line(&self, line_number: u32) -> Option<String> {
        let idx = line_number.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1)) // strip the \n
            .unwrap_or(self.bytes.len());
        let line = String::from_utf8_lossy(&self.bytes[start..end]);
        Some(line.trim_end_matches('\r').to_string())
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
