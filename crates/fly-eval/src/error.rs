//! Runtime error types for the flylang evaluator.

use fly_types::ast::Element;
use fly_types::SyntaxError;

/// Evaluation error: every fatal condition raised while running a program.
///
/// Control transfer (`return`, `break`) is not an error and never travels
/// through this type; see [`Flow`](crate::Flow).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// An atom with no binding anywhere in the context chain.
    #[error("undefined atom: {0}")]
    UndefinedAtom(String),

    /// The head of an evaluated list is not a closure or builtin.
    #[error("the first element of a list must be callable, found {0}")]
    NotCallable(String),

    /// A `cond` or `while` guard produced something other than a boolean.
    #[error("{form} guard must evaluate to a boolean, found {found}")]
    NonBooleanGuard { form: &'static str, found: String },

    /// Argument count differs from the callee's parameter count.
    #[error("wrong number of arguments to {name}: expected {expected}, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Unsupported operand kinds for a builtin.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Division by zero, integer overflow, non-finite real result.
    #[error("arithmetic trap: {0}")]
    ArithmeticTrap(String),

    /// `cons` would build a list nested deeper than the limit.
    #[error("list nesting exceeds {0} levels")]
    NestingTooDeep(usize),

    /// `break` reached the top of the program without an enclosing loop.
    #[error("break outside of a loop")]
    UncaughtBreak,

    /// The step budget ran out.
    #[error("gas exhausted after {0} steps")]
    GasExhausted(u64),

    /// Closure or `eval` invocations nested deeper than the configured limit.
    #[error("maximum call depth of {0} exceeded")]
    DepthExceeded(usize),
}

impl EvalError {
    /// Stable snake_case identifier for machine-readable diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UndefinedAtom(_) => "undefined_atom",
            Self::NotCallable(_) => "not_callable",
            Self::NonBooleanGuard { .. } => "non_boolean_guard",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::TypeMismatch(_) => "type_mismatch",
            Self::ArithmeticTrap(_) => "arithmetic_trap",
            Self::NestingTooDeep(_) => "nesting_too_deep",
            Self::UncaughtBreak => "uncaught_break",
            Self::GasExhausted(_) => "gas_exhausted",
            Self::DepthExceeded(_) => "depth_exceeded",
        }
    }

    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch(message.into())
    }

    pub(crate) fn arithmetic(message: impl Into<String>) -> Self {
        Self::ArithmeticTrap(message.into())
    }
}

/// Render a value together with its kind, e.g. `1.5 (real)`.
pub(crate) fn describe(value: &Element) -> String {
    format!("{value} ({})", value.kind_name())
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Any failure of the scan → parse → evaluate pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Runtime error: {0}")]
    Eval(#[from] EvalError),
}
