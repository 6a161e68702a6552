//! Core parser infrastructure: token cursor, error reporting, helpers.

use fly_lexer::{Lexer, Token, TokenKind};
use fly_types::ast::Program;
use fly_types::{ErrorCode, SourceFile, SyntaxError};

/// Maximum nesting of lists and quotes accepted by the parser.
pub const MAX_NESTING_DEPTH: u32 = 256;

/// Result alias for parser operations.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// The flylang parser.
///
/// Pulls tokens from a [`Lexer`] on demand, keeping exactly one token of
/// lookahead. The first error aborts parsing.
pub struct Parser<'src> {
    /// Token source.
    lexer: Lexer<'src>,
    /// One-token lookahead.
    current: Token,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Current list and quote nesting depth.
    depth: u32,
}

impl<'src> Parser<'src> {
    /// Create a parser and prime its lookahead token.
    pub fn new(mut lexer: Lexer<'src>) -> ParseResult<Self> {
        let current = lexer.next_token()?;
        let source_file = lexer.source_file();
        Ok(Self {
            lexer,
            current,
            source_file,
            depth: 0,
        })
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Check if the current token matches the given kind.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    // ── Nesting ───────────────────────────────────────────────────────────────

    /// Enter one level of list or quote nesting.
    pub(crate) fn enter_nesting(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("maximum nesting depth is {MAX_NESTING_DEPTH}"),
            ));
        }
        Ok(())
    }

    pub(crate) fn leave_nesting(&mut self) {
        self.depth -= 1;
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched.
    pub(crate) fn expect(&mut self, expected: TokenKind) -> ParseResult<Token> {
        if self.check(expected) {
            self.advance()
        } else {
            Err(self.unexpected(&format!("'{expected}'")))
        }
    }

    /// Expect an identifier token. Returns its name.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> ParseResult<String> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance()?.literal)
        } else {
            Err(self.unexpected(what))
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build an "expected X, found Y" error at the current token.
    ///
    /// The code reflects what was actually found: running out of input
    /// means a list was left open, and an illegal token is reported as such.
    pub(crate) fn unexpected(&self, expected: &str) -> SyntaxError {
        let code = match self.current.kind {
            TokenKind::Eof => ErrorCode::UNCLOSED_LIST,
            TokenKind::Illegal => ErrorCode::ILLEGAL_TOKEN,
            _ => ErrorCode::UNEXPECTED_TOKEN,
        };
        self.error_at_current(code, format!("expected {expected}, found {}", self.current))
    }

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&self, code: ErrorCode, message: impl Into<String>) -> SyntaxError {
        let position = self.current.position;
        let source_line = self.source_file.line(position.line).unwrap_or_default();
        SyntaxError::new(&self.source_file.name, code, message, position, source_line)
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse elements until end of input.
    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut elements = Vec::new();
        while !self.at_end() {
            elements.push(self.parse_element()?);
        }
        let program = Program::new(elements);
        tracing::debug!(file = %self.source_file.name, elements = program.len(), "parsed program");
        Ok(program)
    }
}

/// Scan and parse a whole source file.
pub fn parse(source_file: &SourceFile) -> ParseResult<Program> {
    Parser::new(Lexer::new(source_file))?.parse_program()
}
