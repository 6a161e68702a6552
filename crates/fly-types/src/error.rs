use crate::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// The byte stream could not be decoded into characters.
    Encoding,
    /// The token stream does not match the grammar.
    Syntax,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => write!(f, "encoding"),
            Self::Syntax => write!(f, "syntax"),
        }
    }
}

/// Numeric error code (E100–E199).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Encoding errors (E100–E149) ──
    pub const INVALID_ENCODING: Self = Self(100);
    pub const FORBIDDEN_CHARACTER: Self = Self(101);

    // ── Syntax errors (E150–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(150);
    pub const UNCLOSED_LIST: Self = Self(151);
    pub const ILLEGAL_TOKEN: Self = Self(152);
    pub const INVALID_NUMBER: Self = Self(153);
    pub const INVALID_PARAMETER: Self = Self(154);
    pub const NESTING_TOO_DEEP: Self = Self(155);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=149 => ErrorCategory::Encoding,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A fatal error raised while scanning or parsing.
///
/// Parsing never recovers: the first syntax error aborts the pipeline and
/// no partial program is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("Syntax error: {message} {position}")]
pub struct SyntaxError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E150).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable message, usually an expectation description.
    pub message: String,
    /// Where the offending token starts.
    #[serde(flatten)]
    pub position: Position,
    /// The exact source line for context.
    pub source_line: String,
}

impl SyntaxError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        position: Position,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            position,
            source_line: source_line.into(),
        }
    }

    /// Render the error as a JSON diagnostic object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxError {
        SyntaxError::new(
            "test.fly",
            ErrorCode::UNEXPECTED_TOKEN,
            "expected ')', found end of input",
            Position::new(10, 2, 4),
            "(plus",
        )
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(
            ErrorCode::INVALID_ENCODING.category(),
            ErrorCategory::Encoding
        );
        assert_eq!(
            ErrorCode::FORBIDDEN_CHARACTER.category(),
            ErrorCategory::Encoding
        );
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::INVALID_NUMBER.category(), ErrorCategory::Syntax);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::UNEXPECTED_TOKEN), "E150");
        assert_eq!(format!("{}", ErrorCode::INVALID_ENCODING), "E100");
    }

    #[test]
    fn test_syntax_error_display() {
        assert_eq!(
            sample().to_string(),
            "Syntax error: expected ')', found end of input 2:4"
        );
    }

    #[test]
    fn test_syntax_error_creation() {
        let err = sample();
        assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
        assert_eq!(err.category, ErrorCategory::Syntax);
        assert_eq!(err.source_line, "(plus");
    }

    #[test]
    fn test_syntax_error_json() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"code\": 150"));
        assert!(json.contains("\"category\": \"syntax\""));
        // Position is flattened into the top-level object
        assert!(json.contains("\"line\": 2"));
        assert!(json.contains("\"column\": 4"));
        assert!(json.contains("\"offset\": 10"));

        let back: SyntaxError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
