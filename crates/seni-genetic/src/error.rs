//! Error type for trait and genotype operations.

use seni_eval::EvalError;
use seni_types::SeniError;

#[derive(Debug, thiserror::Error)]
pub enum GeneticError {
    /// Parameter annotations that do not compile
    #[error("trait parameters do not compile: {0}")]
    Compile(#[from] SeniError),
    /// Parameter annotations that fail at runtime
    #[error("trait {gen_sym}: {source}")]
    Eval {
        gen_sym: String,
        #[source]
        source: EvalError,
    },
    /// Parameters evaluated to a function or to no value
    #[error("trait {0} did not produce a gene")]
    NoGene(String),
    #[error("cannot breed from an empty population")]
    EmptyPopulation,
    #[error("genotype {index} has {found} genes, expected {expected}")]
    LengthMismatch {
        index: usize,
        found: usize,
        expected: usize,
    },
}
