//! Element parsing: atoms, literals, quotes and lists.
//!
//! ```text
//! element := atom | literal | "'" element | list
//! list    := "(" ( specialform | element* ) ")"
//! ```

use fly_lexer::TokenKind;
use fly_types::ast::{Element, Literal};
use fly_types::ErrorCode;

use crate::parser::{ParseResult, Parser};

impl<'src> Parser<'src> {
    /// Parse one element, dispatching on the current token.
    pub(crate) fn parse_element(&mut self) -> ParseResult<Element> {
        match self.peek_kind() {
            TokenKind::Identifier => self.parse_atom(),
            kind if kind.is_literal() => self.parse_literal(),
            TokenKind::ShortQuote => self.parse_short_quote(),
            TokenKind::LParen => self.parse_list(),
            kind if kind.is_keyword() => Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("keyword {} must directly follow '('", self.peek()),
            )),
            _ => Err(self.unexpected("element")),
        }
    }

    fn parse_atom(&mut self) -> ParseResult<Element> {
        let name = self.expect_identifier("atom")?;
        Ok(Element::Atom(name))
    }

    fn parse_literal(&mut self) -> ParseResult<Element> {
        let literal = match self.peek_kind() {
            TokenKind::Integer => {
                let text = &self.peek().literal;
                let value = text.parse::<i64>().map_err(|_| {
                    self.error_at_current(
                        ErrorCode::INVALID_NUMBER,
                        format!("integer literal '{text}' is out of range"),
                    )
                })?;
                Literal::Integer(value)
            }
            TokenKind::Real => {
                let text = &self.peek().literal;
                let value = text.parse::<f64>().map_err(|_| {
                    self.error_at_current(
                        ErrorCode::INVALID_NUMBER,
                        format!("invalid real literal '{text}'"),
                    )
                })?;
                Literal::Real(value)
            }
            TokenKind::Boolean => Literal::Boolean(self.peek().literal == "true"),
            TokenKind::Null => Literal::Null,
            _ => return Err(self.unexpected("literal")),
        };
        self.advance()?;
        Ok(Element::Literal(literal))
    }

    /// `'element`, sugar for `(quote element)`.
    fn parse_short_quote(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::ShortQuote)?;
        self.enter_nesting()?;
        let inner = self.parse_element()?;
        self.leave_nesting();
        Ok(Element::Quote(Box::new(inner)))
    }

    /// Parse a parenthesised list or special form.
    ///
    /// The token right after `(` is the only signal that separates a
    /// special form from a plain list. Either way the closing `)` is
    /// consumed here.
    pub(crate) fn parse_list(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::LParen)?;
        self.enter_nesting()?;

        let element = match self.peek_kind() {
            TokenKind::Quote => self.parse_quote()?,
            TokenKind::Setq => self.parse_setq()?,
            TokenKind::Func => self.parse_func()?,
            TokenKind::Lambda => self.parse_lambda()?,
            TokenKind::Prog => self.parse_prog()?,
            TokenKind::Cond => self.parse_cond()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Break => self.parse_break()?,
            _ => Element::List(self.parse_sequence()?),
        };

        self.expect(TokenKind::RParen)?;
        self.leave_nesting();
        Ok(element)
    }

    /// Parse elements greedily until the enclosing `)` (not consumed).
    pub(crate) fn parse_sequence(&mut self) -> ParseResult<Vec<Element>> {
        let mut elements = Vec::new();
        while !self.check(TokenKind::RParen) {
            if self.at_end() {
                return Err(self.unexpected("')'"));
            }
            elements.push(self.parse_element()?);
        }
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use fly_types::ast::Element;
    use fly_types::{ErrorCode, SourceFile};

    fn parse_one(source: &str) -> Element {
        let sf = SourceFile::new("test.fly", source);
        let mut program = parse(&sf).expect("parse failed");
        assert_eq!(program.elements.len(), 1);
        program.elements.remove(0)
    }

    #[test]
    fn test_nested_lists() {
        let e = parse_one("(a (b (c)) ())");
        assert_eq!(e.to_string(), "(a (b (c)) ())");
    }

    #[test]
    fn test_keyword_outside_head_position_is_error() {
        // Only the token directly after `(` may be a special-form keyword
        let sf = SourceFile::new("test.fly", "(a setq)");
        let err = parse(&sf).unwrap_err();
        assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
        assert_eq!(err.message, "keyword 'setq' must directly follow '('");
    }

    #[test]
    fn test_nesting_limit() {
        let depth = crate::MAX_NESTING_DEPTH as usize + 1;
        let src = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
        let sf = SourceFile::new("test.fly", src);
        let err = parse(&sf).unwrap_err();
        assert_eq!(err.code, ErrorCode::NESTING_TOO_DEEP);
    }

    #[test]
    fn test_short_quote_chain_counts_toward_nesting_limit() {
        let src = format!("{}a", "'".repeat(200_000));
        let sf = SourceFile::new("test.fly", src);
        let err = parse(&sf).unwrap_err();
        assert_eq!(err.code, ErrorCode::NESTING_TOO_DEEP);

        let depth = crate::MAX_NESTING_DEPTH as usize;
        let sf = SourceFile::new("test.fly", format!("{}a", "'".repeat(depth)));
        assert!(parse(&sf).is_ok());
    }

    #[test]
    fn test_quotes_and_lists_share_nesting_limit() {
        let half = crate::MAX_NESTING_DEPTH as usize / 2 + 1;
        let src = format!("{}{}", "'(".repeat(half), ")".repeat(half));
        let sf = SourceFile::new("test.fly", src);
        let err = parse(&sf).unwrap_err();
        assert_eq!(err.code, ErrorCode::NESTING_TOO_DEEP);
    }
}
