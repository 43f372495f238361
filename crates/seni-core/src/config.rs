//! Pipeline configuration.

use seni_eval::EvalConfig;
use seni_genetic::GeneticConfig;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Settings for every stage, readable from JSON.
///
/// ```json
/// { "eval": { "gas_limit": 50000 }, "strict_compile": true }
/// ```
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub eval: EvalConfig,
    pub genetic: GeneticConfig,
    /// Abort on any compile error instead of evaluating the best-effort forms.
    pub strict_compile: bool,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }
}
