//! Lexer tests for flylang.
//!
//! Covers: keyword classification, identifiers, integer/real literals with
//! signs, malformed numbers, punctuation, whitespace, positions, encoding
//! failures, and determinism.

use fly_lexer::{Lexer, Token, TokenKind};
use fly_types::{ErrorCode, Position, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return all tokens (including the final Eof).
fn tokens(source: &str) -> Vec<Token> {
    let sf = SourceFile::new("test.fly", source);
    Lexer::new(&sf).tokenize().expect("lexing failed")
}

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    tokens(source)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex a single token and return (kind, literal).
fn first(source: &str) -> (TokenKind, String) {
    let t = tokens(source).into_iter().next().expect("no token");
    (t.kind, t.literal)
}

// ─────────────────────────────────────────────────────────────────────
// Numbers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_numbers() {
    let cases = [
        ("0", TokenKind::Integer, "0"),
        ("1", TokenKind::Integer, "1"),
        ("123", TokenKind::Integer, "123"),
        ("0.0", TokenKind::Real, "0.0"),
        ("1.0", TokenKind::Real, "1.0"),
        ("1.1", TokenKind::Real, "1.1"),
        ("1.1.1", TokenKind::Illegal, "1.1.1"),
    ];
    for (src, kind, lit) in cases {
        assert_eq!(first(src), (kind, lit.to_string()), "input '{src}'");
    }
}

#[test]
fn test_signed_numbers_keep_sign() {
    assert_eq!(first("-7"), (TokenKind::Integer, "-7".into()));
    assert_eq!(first("+3"), (TokenKind::Integer, "+3".into()));
    assert_eq!(first("-0.25"), (TokenKind::Real, "-0.25".into()));
}

#[test]
fn test_trailing_dot_is_illegal() {
    assert_eq!(first("5."), (TokenKind::Illegal, "5.".into()));
}

#[test]
fn test_letter_after_digits_is_illegal() {
    let k = kinds("12ab");
    assert_eq!(k[0], TokenKind::Illegal);
    // The letters start a new token
    assert_eq!(k[1], TokenKind::Identifier);
}

#[test]
fn test_leading_dot_is_illegal() {
    assert_eq!(first(".5").0, TokenKind::Illegal);
}

#[test]
fn test_number_ends_at_paren() {
    assert_eq!(
        kinds("(1 2.5)"),
        vec![
            TokenKind::LParen,
            TokenKind::Integer,
            TokenKind::Real,
            TokenKind::RParen
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Identifiers & keywords
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_identifiers() {
    for src in ["a", "abc", "a1", "a1b2c3", "plus", "isnull"] {
        assert_eq!(first(src), (TokenKind::Identifier, src.to_string()));
    }
}

#[test]
fn test_special_form_keywords() {
    let pairs = [
        ("setq", TokenKind::Setq),
        ("func", TokenKind::Func),
        ("lambda", TokenKind::Lambda),
        ("prog", TokenKind::Prog),
        ("cond", TokenKind::Cond),
        ("while", TokenKind::While),
        ("return", TokenKind::Return),
        ("break", TokenKind::Break),
        ("quote", TokenKind::Quote),
    ];
    for (src, expected) in pairs {
        assert_eq!(kinds(src), vec![expected], "keyword '{src}'");
    }
}

#[test]
fn test_literal_keywords() {
    assert_eq!(first("true"), (TokenKind::Boolean, "true".into()));
    assert_eq!(first("false"), (TokenKind::Boolean, "false".into()));
    assert_eq!(first("null"), (TokenKind::Null, "null".into()));
}

#[test]
fn test_identifier_stops_at_non_alphanumeric() {
    // `_` is not an identifier character
    assert_eq!(
        kinds("my_var"),
        vec![TokenKind::Identifier, TokenKind::Illegal, TokenKind::Identifier]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Punctuation & whitespace
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_short_quote() {
    assert_eq!(
        kinds("'(1)"),
        vec![
            TokenKind::ShortQuote,
            TokenKind::LParen,
            TokenKind::Integer,
            TokenKind::RParen
        ]
    );
}

#[test]
fn test_whitespace_kinds_skipped() {
    assert_eq!(kinds(" \t\r\n a \n"), vec![TokenKind::Identifier]);
}

#[test]
fn test_illegal_characters() {
    for src in ["[", "#", "*", "\"", ";"] {
        assert_eq!(first(src), (TokenKind::Illegal, src.to_string()));
    }
}

#[test]
fn test_empty_input_is_eof() {
    let t = tokens("");
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].kind, TokenKind::Eof);
    assert_eq!(t[0].position, Position::start());
}

#[test]
fn test_next_token_on_owned_lexer() {
    let sf = SourceFile::new("test.fly", "(a 1)");
    let mut lexer = Lexer::new(&sf);
    let mut got = Vec::new();
    loop {
        let token = lexer.next_token().expect("lexing failed");
        if token.kind == TokenKind::Eof {
            break;
        }
        got.push(token.kind);
    }
    assert_eq!(
        got,
        vec![
            TokenKind::LParen,
            TokenKind::Identifier,
            TokenKind::Integer,
            TokenKind::RParen
        ]
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

// ─────────────────────────────────────────────────────────────────────
// Programs
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_program() {
    let src = "
(setq a 2)
(lambda (x) (plus x 1))
(cond ((greater a 0) 2 true))
(return 1)
";
    let want = [
        (TokenKind::LParen, "("),
        (TokenKind::Setq, "setq"),
        (TokenKind::Identifier, "a"),
        (TokenKind::Integer, "2"),
        (TokenKind::RParen, ")"),
        (TokenKind::LParen, "("),
        (TokenKind::Lambda, "lambda"),
        (TokenKind::LParen, "("),
        (TokenKind::Identifier, "x"),
        (TokenKind::RParen, ")"),
        (TokenKind::LParen, "("),
        (TokenKind::Identifier, "plus"),
        (TokenKind::Identifier, "x"),
        (TokenKind::Integer, "1"),
        (TokenKind::RParen, ")"),
        (TokenKind::RParen, ")"),
        (TokenKind::LParen, "("),
        (TokenKind::Cond, "cond"),
        (TokenKind::LParen, "("),
        (TokenKind::LParen, "("),
        (TokenKind::Identifier, "greater"),
        (TokenKind::Identifier, "a"),
        (TokenKind::Integer, "0"),
        (TokenKind::RParen, ")"),
        (TokenKind::Integer, "2"),
        (TokenKind::Boolean, "true"),
        (TokenKind::RParen, ")"),
        (TokenKind::RParen, ")"),
        (TokenKind::LParen, "("),
        (TokenKind::Return, "return"),
        (TokenKind::Integer, "1"),
        (TokenKind::RParen, ")"),
        (TokenKind::Eof, ""),
    ];
    let got = tokens(src);
    assert_eq!(got.len(), want.len());
    for (i, (token, (kind, lit))) in got.iter().zip(want.iter()).enumerate() {
        assert_eq!(token.kind, *kind, "token {i}");
        assert_eq!(token.literal, *lit, "token {i}");
    }
}

#[test]
fn test_positions_across_lines() {
    let t = tokens("(setq a 1)\n(plus a\n   2)");
    let two = t.iter().find(|t| t.literal == "2").unwrap();
    assert_eq!(two.position.line, 3);
    assert_eq!(two.position.column, 4);
    assert_eq!(two.position.offset, 22);
}

// ─────────────────────────────────────────────────────────────────────
// Encoding errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_utf8_is_fatal() {
    let sf = SourceFile::new("test.fly", vec![b'(', 0xff, b')']);
    let err = Lexer::new(&sf).tokenize().unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_ENCODING);
    assert_eq!(err.position, Position::new(1, 1, 2));
}

#[test]
fn test_nul_is_fatal() {
    let sf = SourceFile::new("test.fly", vec![b'a', b'\n', 0]);
    let err = Lexer::new(&sf).tokenize().unwrap_err();
    assert_eq!(err.code, ErrorCode::FORBIDDEN_CHARACTER);
    assert_eq!(err.position.line, 2);
    assert!(err.to_string().starts_with("Syntax error: illegal character NUL"));
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_determinism_100_iterations() {
    let src = "(func fib (n) (cond ((lesseq n 1) n) (plus (fib (minus n 1)) (fib (minus n 2)))))";
    let first_run = tokens(src);
    for i in 0..100 {
        assert_eq!(tokens(src), first_run, "Determinism failure at iteration {i}");
    }
}
