//! Pipeline error: which stage failed, and why.

use seni_eval::EvalError;
use seni_genetic::GeneticError;
use seni_types::genotype::GenotypeError;
use seni_types::SeniError;
use seni_unparser::UnparseError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("lex error: {0}")]
    Lex(SeniError),
    #[error("parse error: {0}")]
    Parse(SeniError),
    #[error("compile error: {0}")]
    Compile(SeniError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Genetic(#[from] GeneticError),
    #[error("unparse error: {0}")]
    Unparse(#[from] UnparseError),
    #[error(transparent)]
    Genotype(#[from] GenotypeError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
