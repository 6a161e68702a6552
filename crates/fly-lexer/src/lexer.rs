//! Core flylang lexer: classifies source bytes into tokens on demand.
//!
//! Features:
//! - Lazy: [`Lexer::next_token`] scans one token per call, so the parser can
//!   drive it with a single token of lookahead
//! - Keyword classification through [`TokenKind::lookup`]
//! - Signed integer and real literals with malformed-number detection
//! - Fail-fast on invalid UTF-8 and NUL bytes

use fly_types::{ErrorCode, Position, SourceFile, SyntaxError};

use crate::token::{Token, TokenKind};

/// Result alias for lexer operations.
pub type LexResult<T> = Result<T, SyntaxError>;

/// The flylang lexer.
///
/// Call [`Lexer::next_token`] repeatedly until it returns a
/// [`TokenKind::Eof`] token; further calls keep returning `Eof`. The lexer
/// is also an [`Iterator`] that stops after yielding `Eof` or an error.
pub struct Lexer<'src> {
    /// The full source as bytes.
    source: &'src [u8],
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, counted in bytes).
    col: u32,
    /// Set once the iterator has yielded `Eof` or an error.
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: &source_file.bytes,
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            finished: false,
        }
    }

    /// The source file being scanned.
    pub fn source_file(&self) -> &'src SourceFile {
        self.source_file
    }

    /// Lex the entire source into a token stream ending with `Eof`.
    pub fn tokenize(self) -> LexResult<Vec<Token>> {
        self.collect()
    }

    /// Scan the next token.
    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace();

        let start = self.current_position();
        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", start));
        };

        let token = match ch {
            // ── Identifiers & keywords ──
            b'a'..=b'z' | b'A'..=b'Z' => self.scan_identifier(start),

            // ── Number literals ──
            b'0'..=b'9' => self.scan_number(start),
            b'+' | b'-' if matches!(self.peek_at(1), Some(b'0'..=b'9')) => {
                self.scan_number(start)
            }

            // ── Punctuation ──
            b'(' => self.single(TokenKind::LParen, start),
            b')' => self.single(TokenKind::RParen, start),
            b'\'' => self.single(TokenKind::ShortQuote, start),

            0 => {
                return Err(self.error(
                    ErrorCode::FORBIDDEN_CHARACTER,
                    "illegal character NUL",
                    start,
                ));
            }
            0x80..=0xff => self.scan_non_ascii(start)?,

            _ => {
                self.advance();
                Token::new(TokenKind::Illegal, (ch as char).to_string(), start)
            }
        };

        tracing::trace!(kind = token.kind.name(), literal = %token.literal, at = %token.position, "scanned token");
        Ok(token)
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_position(&self) -> Position {
        Position::new(self.pos, self.line, self.col)
    }

    fn text_from(&self, start: Position) -> String {
        String::from_utf8_lossy(&self.source[start.offset..self.pos]).into_owned()
    }

    fn single(&mut self, kind: TokenKind, start: Position) -> Token {
        self.advance();
        Token::new(kind, self.text_from(start), start)
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>, position: Position) -> SyntaxError {
        let source_line = self.source_file.line(position.line).unwrap_or_default();
        SyntaxError::new(&self.source_file.name, code, message, position, source_line)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start: Position) -> Token {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() {
                self.advance();
            } else {
                break;
            }
        }
        let text = self.text_from(start);
        Token::new(TokenKind::lookup(&text), text, start)
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    /// Scan `[+-]digits[.digits]`.
    ///
    /// The whole run of digits and dots is consumed even when it is
    /// malformed, so `1.1.1` is reported as one illegal token.
    fn scan_number(&mut self, start: Position) -> Token {
        if let Some(b'+' | b'-') = self.peek() {
            self.advance();
        }

        let mut dots = 0;
        let mut last = None;
        while let Some(ch @ (b'0'..=b'9' | b'.')) = self.peek() {
            if ch == b'.' {
                dots += 1;
            }
            last = Some(ch);
            self.advance();
        }

        let letter_follows = matches!(self.peek(), Some(ch) if ch.is_ascii_alphabetic());
        let kind = if dots > 1 || letter_follows || last == Some(b'.') {
            TokenKind::Illegal
        } else if dots == 1 {
            TokenKind::Real
        } else {
            TokenKind::Integer
        };

        Token::new(kind, self.text_from(start), start)
    }

    // ─────────────────────────────────────────────────────────────
    // Non-ASCII input
    // ─────────────────────────────────────────────────────────────

    /// Decode one multi-byte character. Valid characters can never start a
    /// token, so they become [`TokenKind::Illegal`]; invalid encodings are
    /// fatal.
    fn scan_non_ascii(&mut self, start: Position) -> LexResult<Token> {
        let rest = &self.source[self.pos..];
        let width = rest.len().min(4);
        let decoded = match std::str::from_utf8(&rest[..width]) {
            Ok(s) => s.chars().next(),
            Err(e) if e.valid_up_to() > 0 => std::str::from_utf8(&rest[..e.valid_up_to()])
                .ok()
                .and_then(|s| s.chars().next()),
            Err(_) => None,
        };

        let Some(ch) = decoded else {
            return Err(self.error(
                ErrorCode::INVALID_ENCODING,
                "illegal UTF-8 encoding",
                start,
            ));
        };
        for _ in 0..ch.len_utf8() {
            self.advance();
        }
        Ok(Token::new(TokenKind::Illegal, ch.to_string(), start))
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if !matches!(&result, Ok(token) if token.kind != TokenKind::Eof) {
            self.finished = true;
        }
        Some(result)
    }
}
