//! Shared types for the flylang runtime.
//!
//! This crate defines source positions, syntax errors, the [`ast::Element`]
//! model shared by the parser and the evaluator, and the lexical
//! [`Context`] chain that elements are evaluated against.

mod context;
mod error;
mod span;
pub mod ast;

pub use context::{Context, Env};
pub use error::{ErrorCategory, ErrorCode, SyntaxError};
pub use span::{Position, SourceFile};

/// Result type used by the lexer and parser.
pub type Result<T> = std::result::Result<T, SyntaxError>;
