//! Token types for the flylang lexer.
//!
//! Defines [`TokenKind`], the keyword classification table, and [`Token`],
//! which pairs a kind with its literal text and source [`Position`].

use fly_types::Position;
use std::fmt;

/// Every reserved spelling and the kind it scans to.
///
/// Identifiers are looked up here after scanning; anything not listed is a
/// plain [`TokenKind::Identifier`].
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    // Special forms (9)
    ("setq", TokenKind::Setq),
    ("func", TokenKind::Func),
    ("lambda", TokenKind::Lambda),
    ("prog", TokenKind::Prog),
    ("cond", TokenKind::Cond),
    ("while", TokenKind::While),
    ("return", TokenKind::Return),
    ("break", TokenKind::Break),
    ("quote", TokenKind::Quote),
    // Literal spellings (3)
    ("true", TokenKind::Boolean),
    ("false", TokenKind::Boolean),
    ("null", TokenKind::Null),
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The exact source text, including a leading sign on numbers.
    pub literal: String,
    /// Where the token starts.
    pub position: Position,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            literal: literal.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of input"),
            TokenKind::Identifier
            | TokenKind::Integer
            | TokenKind::Real
            | TokenKind::Boolean
            | TokenKind::Null
            | TokenKind::Illegal => write!(f, "{} '{}'", self.kind, self.literal),
            _ => write!(f, "'{}'", self.kind),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the flylang language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ── Special ──────────────────────────────────────────────
    /// A character or number that cannot start any token.
    Illegal,
    /// End of input.
    Eof,

    // ── Names & Literals ─────────────────────────────────────
    Identifier,
    /// `42`, `-7`, `+3`
    Integer,
    /// `3.14`, `-0.5`
    Real,
    /// `true` / `false`
    Boolean,
    /// `null`
    Null,

    // ── Punctuation ──────────────────────────────────────────
    LParen,
    RParen,
    /// `'`, shorthand for `(quote ...)`
    ShortQuote,

    // ── Special-form keywords ────────────────────────────────
    Quote,
    Setq,
    Func,
    Lambda,
    Prog,
    Cond,
    While,
    Return,
    Break,
}

impl TokenKind {
    /// Classify an identifier spelling.
    pub fn lookup(ident: &str) -> TokenKind {
        Self::from_keyword(ident).unwrap_or(TokenKind::Identifier)
    }

    /// Look up a reserved spelling. Returns `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == s)
            .map(|(_, kind)| *kind)
    }

    /// Returns `true` for kinds that introduce a special form after `(`.
    pub fn is_special_form(&self) -> bool {
        matches!(
            self,
            TokenKind::Quote
                | TokenKind::Setq
                | TokenKind::Func
                | TokenKind::Lambda
                | TokenKind::Prog
                | TokenKind::Cond
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Break
        )
    }

    /// Returns `true` if this kind is scanned from a reserved spelling.
    pub fn is_keyword(&self) -> bool {
        self.is_special_form() || matches!(self, TokenKind::Boolean | TokenKind::Null)
    }

    /// Returns `true` for self-evaluating literal kinds.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Integer | TokenKind::Real | TokenKind::Boolean | TokenKind::Null
        )
    }

    /// Upper-case name used by the token dump.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Null => "NULL",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::ShortQuote => "SHORT_QUOTE",
            TokenKind::Quote => "QUOTE",
            TokenKind::Setq => "SETQ",
            TokenKind::Func => "FUNC",
            TokenKind::Lambda => "LAMBDA",
            TokenKind::Prog => "PROG",
            TokenKind::Cond => "COND",
            TokenKind::While => "WHILE",
            TokenKind::Return => "RETURN",
            TokenKind::Break => "BREAK",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Illegal => f.write_str("illegal token"),
            TokenKind::Eof => f.write_str("end of input"),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::Integer => f.write_str("integer"),
            TokenKind::Real => f.write_str("real"),
            TokenKind::Boolean => f.write_str("boolean"),
            TokenKind::Null => f.write_str("null"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::ShortQuote => f.write_str("'"),
            TokenKind::Quote => f.write_str("quote"),
            TokenKind::Setq => f.write_str("setq"),
            TokenKind::Func => f.write_str("func"),
            TokenKind::Lambda => f.write_str("lambda"),
            TokenKind::Prog => f.write_str("prog"),
            TokenKind::Cond => f.write_str("cond"),
            TokenKind::While => f.write_str("while"),
            TokenKind::Return => f.write_str("return"),
            TokenKind::Break => f.write_str("break"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_count() {
        assert_eq!(KEYWORDS.len(), 12);
    }

    #[test]
    fn test_from_keyword_recognises_all() {
        for (spelling, kind) in KEYWORDS {
            assert_eq!(TokenKind::from_keyword(spelling), Some(*kind), "{spelling}");
            assert!(kind.is_keyword(), "{spelling} should be a keyword");
        }
    }

    #[test]
    fn test_lookup_identifiers() {
        for name in ["a", "plus", "x1", "setqq", "nil", "Quote", "TRUE"] {
            assert_eq!(TokenKind::lookup(name), TokenKind::Identifier, "{name}");
        }
    }

    #[test]
    fn test_keyword_case_sensitivity() {
        assert_eq!(TokenKind::lookup("while"), TokenKind::While);
        assert_eq!(TokenKind::lookup("While"), TokenKind::Identifier);
        assert_eq!(TokenKind::lookup("Null"), TokenKind::Identifier);
    }

    #[test]
    fn test_literal_spellings_are_not_special_forms() {
        assert!(!TokenKind::Boolean.is_special_form());
        assert!(!TokenKind::Null.is_special_form());
        assert!(TokenKind::Boolean.is_literal());
        assert!(TokenKind::Quote.is_special_form());
        assert!(!TokenKind::ShortQuote.is_special_form());
    }

    #[test]
    fn test_display_roundtrip_special_forms() {
        for (spelling, kind) in KEYWORDS {
            if kind.is_special_form() {
                assert_eq!(kind.to_string(), *spelling);
            }
        }
    }

    #[test]
    fn test_token_display() {
        let pos = Position::start();
        assert_eq!(
            Token::new(TokenKind::Identifier, "abc", pos).to_string(),
            "identifier 'abc'"
        );
        assert_eq!(Token::new(TokenKind::RParen, ")", pos).to_string(), "')'");
        assert_eq!(Token::new(TokenKind::Eof, "", pos).to_string(), "end of input");
    }

    #[test]
    fn test_token_names() {
        assert_eq!(TokenKind::ShortQuote.name(), "SHORT_QUOTE");
        assert_eq!(TokenKind::Integer.name(), "INTEGER");
    }
}
