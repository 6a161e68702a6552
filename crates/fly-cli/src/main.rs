//! `fly`: run a flylang source file.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use fly_eval::{global_context, EvalConfig, EvalError, Evaluator};
use fly_lexer::{Lexer, Token, TokenKind};
use fly_types::{SourceFile, SyntaxError};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "FLY_LOG";

#[derive(Parser, Debug)]
#[command(name = "fly", version, about = "Run a flylang program")]
struct Cli {
    /// Source file to run.
    file: PathBuf,

    /// Print the token stream and exit without evaluating.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program before evaluating it.
    #[arg(long)]
    ast: bool,

    /// Report errors as JSON on stderr.
    #[arg(long)]
    json: bool,

    /// Maximum number of evaluation steps.
    #[arg(long, value_name = "N", default_value_t = EvalConfig::DEFAULT_GAS_LIMIT)]
    gas_limit: u64,

    /// Maximum nesting of function calls.
    #[arg(long, value_name = "N", default_value_t = EvalConfig::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log evaluation progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn eval_config(&self) -> EvalConfig {
        EvalConfig::new()
            .with_gas_limit(self.gas_limit)
            .with_max_depth(self.max_depth)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    install_tracing(cli.verbose);

    let bytes = fs::read(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    let source = SourceFile::new(cli.file.display().to_string(), bytes);
    tracing::debug!(
        file = %source.name,
        bytes = source.bytes.len(),
        lines = source.line_count(),
        "loaded source"
    );

    if cli.tokens {
        return Ok(match Lexer::new(&source).tokenize() {
            Ok(tokens) => {
                print!("{}", render_tokens(&tokens));
                ExitCode::SUCCESS
            }
            Err(e) => report_syntax_error(&e, cli.json),
        });
    }

    let program = match fly_parser::parse(&source) {
        Ok(program) => program,
        Err(e) => return Ok(report_syntax_error(&e, cli.json)),
    };
    if cli.ast {
        print!("{program}");
    }

    let env = global_context();
    let mut evaluator = Evaluator::with_config(cli.eval_config());
    let outcome = evaluator.eval_program(&program, &env);
    tracing::debug!(
        gas_used = evaluator.gas_used(),
        gas_limit = evaluator.config().gas_limit,
        "evaluation ended"
    );
    match outcome {
        Ok(value) => {
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_eval_error(&e, cli.json)),
    }
}

fn install_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// One token per line: `KIND literal`.
fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(token.kind.name());
        if token.kind != TokenKind::Eof {
            out.push(' ');
            out.push_str(&token.literal);
        }
        out.push('\n');
    }
    out
}

/// Human-readable syntax error with the offending line and a caret.
fn render_syntax_error(err: &SyntaxError) -> String {
    let pos = err.position;
    let gutter = pos.line.to_string();
    let pad = " ".repeat(gutter.len());
    let caret = " ".repeat(pos.column.saturating_sub(1) as usize);
    format!(
        "{err} [{code}]\n{pad}--> {file}:{line}:{col}\n{gutter} | {src}\n{pad} | {caret}^",
        code = err.code,
        file = err.file,
        line = pos.line,
        col = pos.column,
        src = err.source_line,
    )
}

fn eval_error_json(err: &EvalError) -> String {
    let value = json!({
        "category": "runtime",
        "kind": err.kind(),
        "message": err.to_string(),
    });
    // A `json!` object always serializes
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

fn report_syntax_error(err: &SyntaxError, as_json: bool) -> ExitCode {
    let rendered = if as_json {
        err.to_json().unwrap_or_else(|_| err.to_string())
    } else {
        render_syntax_error(err)
    };
    eprintln!("{rendered}");
    ExitCode::FAILURE
}

fn report_eval_error(err: &EvalError, as_json: bool) -> ExitCode {
    if as_json {
        eprintln!("{}", eval_error_json(err));
    } else {
        eprintln!("Runtime error: {err}");
    }
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fly_types::{ErrorCode, Position};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_onto_config() {
        let cli = Cli::parse_from(["fly", "prog.fly", "--gas-limit", "50", "--max-depth", "4"]);
        assert_eq!(cli.eval_config(), EvalConfig::new().with_gas_limit(50).with_max_depth(4));
        let cli = Cli::parse_from(["fly", "prog.fly"]);
        assert_eq!(cli.eval_config(), EvalConfig::default());
        assert!(!cli.tokens && !cli.ast && !cli.json && !cli.verbose);
    }

    #[test]
    fn test_render_tokens() {
        let sf = SourceFile::new("t.fly", "(setq a 'b)");
        let tokens = Lexer::new(&sf).tokenize().unwrap();
        assert_eq!(
            render_tokens(&tokens),
            "LPAREN (\nSETQ setq\nIDENTIFIER a\nSHORT_QUOTE '\nIDENTIFIER b\nRPAREN )\nEOF\n"
        );
    }

    #[test]
    fn test_render_syntax_error() {
        let err = SyntaxError::new(
            "t.fly",
            ErrorCode::UNCLOSED_LIST,
            "expected ')', found end of input",
            Position::new(5, 1, 6),
            "(plus",
        );
        assert_eq!(
            render_syntax_error(&err),
            "Syntax error: expected ')', found end of input 1:6 [E151]\n \
             --> t.fly:1:6\n1 | (plus\n  |      ^"
        );
    }

    #[test]
    fn test_eval_error_json() {
        let json = eval_error_json(&EvalError::UncaughtBreak);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "uncaught_break");
        assert_eq!(value["category"], "runtime");
        assert_eq!(value["message"], "break outside of a loop");
    }
}
