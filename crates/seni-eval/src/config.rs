//! Interpreter limits.

use serde::{Deserialize, Serialize};

/// Resource limits for one interpreter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Evaluation steps before [`EvalError::GasExhausted`](crate::EvalError::GasExhausted).
    pub gas_limit: u64,
    /// Nested evaluations before [`EvalError::DepthExceeded`](crate::EvalError::DepthExceeded).
    /// One closure call nests about two evaluations; the default fits a 2 MB
    /// thread stack in an unoptimized build.
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            gas_limit: 1_000_000,
            max_depth: 128,
        }
    }
}
