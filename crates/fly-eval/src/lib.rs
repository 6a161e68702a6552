//! flylang tree-walking evaluator.
//!
//! Executes a parsed [`Program`](fly_types::ast::Program) against a chain of
//! lexical [`Context`](fly_types::Context)s. `return` and `break` unwind as
//! [`Flow`] values; fatal conditions are [`EvalError`]s.

pub mod builtins;
mod config;
mod error;
mod evaluator;
mod flow;
mod run;

pub use builtins::{global_context, Builtin, Primitive, BUILTINS};
pub use config::EvalConfig;
pub use error::{EvalError, EvalResult, RunError};
pub use evaluator::Evaluator;
pub use flow::Flow;
pub use run::{run, run_source};
