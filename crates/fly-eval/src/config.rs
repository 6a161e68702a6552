//! Evaluator resource limits.

/// Limits applied to a single program run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of evaluation steps before [`EvalError::GasExhausted`].
    ///
    /// [`EvalError::GasExhausted`]: crate::EvalError::GasExhausted
    pub gas_limit: u64,
    /// Maximum nesting of closure and `eval` invocations before
    /// [`EvalError::DepthExceeded`].
    ///
    /// [`EvalError::DepthExceeded`]: crate::EvalError::DepthExceeded
    pub max_depth: usize,
}

impl EvalConfig {
    pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            gas_limit: Self::DEFAULT_GAS_LIMIT,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
