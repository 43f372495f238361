//! Seni language core.
//!
//! Ties the stages together for callers that start from source text:
//!
//! ```text
//! source ─ lex ─ parse ─ compile ─ evaluate ─→ value
//!                  │         ↑
//!                  │      genotype ─ unparse ─→ source
//!                  └─ traits ─→ genotype ─→ next generation
//! ```
//!
//! Every call builds fresh state, so calls may run on separate threads
//! without coordination.

mod config;
mod error;
mod pipeline;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{
    build_traits, compile_source, create_genotype, digest_forms, evaluate_source,
    next_generation, parse_source, unparse_source, Compiled, Evaluation,
};

pub use seni_eval::{EvalConfig, EvalError, Value};
pub use seni_genetic::{GeneticConfig, GenotypeExt, Trait};
pub use seni_types::{Diagnostics, Form, Genotype, SeniError};
