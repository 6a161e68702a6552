//! Whole-pipeline entry points: source → tokens → program → value.

use fly_types::ast::Element;
use fly_types::SourceFile;

use crate::builtins::global_context;
use crate::config::EvalConfig;
use crate::error::RunError;
use crate::evaluator::Evaluator;

/// Parse and evaluate `source_file` against a fresh global context.
pub fn run_source(source_file: &SourceFile, config: EvalConfig) -> Result<Element, RunError> {
    let program = fly_parser::parse(source_file)?;
    let env = global_context();
    let mut evaluator = Evaluator::with_config(config);
    Ok(evaluator.eval_program(&program, &env)?)
}

/// Run program text with the default limits.
pub fn run(source: &str) -> Result<Element, RunError> {
    run_source(&SourceFile::new("<input>", source), EvalConfig::default())
}
