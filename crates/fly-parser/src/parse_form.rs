//! Special-form parsing.
//!
//! Each routine starts at the form's keyword (the `(` has already been
//! consumed by [`Parser::parse_list`]) and stops before the closing `)`.
//!
//! ```text
//! setq   := "setq" atom element
//! func   := "func" atom params element*
//! lambda := "lambda" params element*
//! prog   := "prog" params element*
//! cond   := "cond" list element [element]
//! while  := "while" element element*
//! return := "return" element
//! break  := "break"
//! quote  := "quote" element
//! params := "(" atom* ")"
//! ```

use std::rc::Rc;

use fly_lexer::TokenKind;
use fly_types::ast::{Cond, Element, Func, Routine, Setq, While};
use fly_types::ErrorCode;

use crate::parser::{ParseResult, Parser};

impl<'src> Parser<'src> {
    pub(crate) fn parse_quote(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::Quote)?;
        let inner = self.parse_element()?;
        Ok(Element::Quote(Box::new(inner)))
    }

    pub(crate) fn parse_setq(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::Setq)?;
        let name = self.expect_identifier("atom after 'setq'")?;
        let value = self.parse_element()?;
        Ok(Element::Setq(Box::new(Setq { name, value })))
    }

    pub(crate) fn parse_func(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::Func)?;
        let name = self.expect_identifier("function name after 'func'")?;
        let routine = self.parse_routine()?;
        Ok(Element::Func(Rc::new(Func {
            name,
            routine: Rc::new(routine),
        })))
    }

    pub(crate) fn parse_lambda(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::Lambda)?;
        Ok(Element::Lambda(Rc::new(self.parse_routine()?)))
    }

    pub(crate) fn parse_prog(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::Prog)?;
        Ok(Element::Prog(Rc::new(self.parse_routine()?)))
    }

    pub(crate) fn parse_cond(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::Cond)?;
        if !self.check(TokenKind::LParen) {
            return Err(self.unexpected("'(' to start the cond guard"));
        }
        let guard = self.parse_list()?;
        let then = self.parse_element()?;
        let otherwise = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_element()?)
        };
        Ok(Element::Cond(Box::new(Cond {
            guard,
            then,
            otherwise,
        })))
    }

    pub(crate) fn parse_while(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::While)?;
        let guard = self.parse_element()?;
        let body = self.parse_sequence()?;
        Ok(Element::While(Box::new(While { guard, body })))
    }

    pub(crate) fn parse_return(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::Return)?;
        let value = self.parse_element()?;
        Ok(Element::Return(Box::new(value)))
    }

    pub(crate) fn parse_break(&mut self) -> ParseResult<Element> {
        self.expect(TokenKind::Break)?;
        Ok(Element::Break)
    }

    // ── Shared pieces ─────────────────────────────────────────────────────────

    /// `params element*`
    fn parse_routine(&mut self) -> ParseResult<Routine> {
        let params = self.parse_params()?;
        let body = self.parse_sequence()?;
        Ok(Routine::new(params, body))
    }

    /// `"(" atom* ")"`; every parameter must be a plain identifier.
    fn parse_params(&mut self) -> ParseResult<Vec<String>> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) {
            match self.peek_kind() {
                TokenKind::Identifier => params.push(self.advance()?.literal),
                TokenKind::Eof => return Err(self.unexpected("')'")),
                _ => {
                    return Err(self.error_at_current(
                        ErrorCode::INVALID_PARAMETER,
                        format!("expected parameter name, found {}", self.peek()),
                    ));
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }
}
