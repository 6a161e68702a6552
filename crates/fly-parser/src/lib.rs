//! flylang parser: converts a token stream into a [`Program`].
//!
//! [`Program`]: fly_types::ast::Program

mod parse_element;
mod parse_form;
mod parser;

pub use parser::{parse, ParseResult, Parser, MAX_NESTING_DEPTH};
