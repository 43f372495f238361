//! Source text in, values and source text out.

use seni_compiler::{compile, compile_with_genotype};
use seni_eval::{Interpreter, Value};
use seni_genetic::{GenotypeExt, Trait};
use seni_lexer::Lexer;
use seni_types::ast::Node;
use seni_types::{Diagnostics, Form, Genotype};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Compiled forms plus any diagnostics the compiler let through.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub forms: Vec<Form>,
    pub diagnostics: Diagnostics,
}

/// Result of running a program.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub forms: Vec<Form>,
    /// Value of the last top-level form.
    pub value: Value,
    /// Hex SHA-256 of the compiled forms; equal inputs give equal digests.
    pub digest: String,
    pub diagnostics: Diagnostics,
}

/// Lex and parse. Either stage failing aborts with no partial tree.
pub fn parse_source(source: &str) -> Result<Vec<Node>, PipelineError> {
    let lexed = Lexer::new(source).lex();
    if let Some(error) = lexed.error {
        return Err(PipelineError::Lex(error));
    }
    seni_parser::parse(lexed.tokens)
        .into_result()
        .map_err(PipelineError::Parse)
}

/// Parse and compile, substituting `genotype` when given.
///
/// With `strict_compile` the first compile error aborts; otherwise the
/// best-effort forms come back with their diagnostics.
pub fn compile_source(
    source: &str,
    genotype: Option<&Genotype>,
    config: &PipelineConfig,
) -> Result<Compiled, PipelineError> {
    let nodes = parse_source(source)?;
    let result = match genotype {
        Some(genotype) => compile_with_genotype(&nodes, genotype),
        None => compile(&nodes),
    };
    if let Some(error) = result.diagnostics.first_error() {
        if config.strict_compile {
            return Err(PipelineError::Compile(error.clone()));
        }
        warn!(
            errors = result.diagnostics.total_errors,
            "compile errors; evaluating best-effort forms"
        );
    }
    Ok(Compiled {
        forms: result.forms,
        diagnostics: result.diagnostics,
    })
}

/// Parse, compile and evaluate in a fresh interpreter.
pub fn evaluate_source(
    source: &str,
    genotype: Option<&Genotype>,
    config: &PipelineConfig,
) -> Result<Evaluation, PipelineError> {
    let Compiled { forms, diagnostics } = compile_source(source, genotype, config)?;
    let digest = digest_forms(&forms)?;
    let mut interpreter = Interpreter::new(config.eval);
    let value = interpreter.evaluate_all(&forms)?;
    debug!(
        forms = forms.len(),
        gas = interpreter.gas_used(),
        digest = %digest,
        "evaluated"
    );
    Ok(Evaluation {
        forms,
        value,
        digest,
        diagnostics,
    })
}

/// Hex SHA-256 of the JSON encoding of `forms`.
pub fn digest_forms(forms: &[Form]) -> Result<String, PipelineError> {
    let bytes = serde_json::to_vec(forms)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// One trait per alterable slot of `source`.
pub fn build_traits(source: &str) -> Result<Vec<Trait>, PipelineError> {
    let nodes = parse_source(source)?;
    Ok(seni_genetic::build_traits(&nodes)?)
}

/// The source's own values, or values sampled from the traits with `seed`.
pub fn create_genotype(traits: &[Trait], seed: Option<u64>) -> Result<Genotype, PipelineError> {
    Ok(match seed {
        Some(seed) => Genotype::from_traits(traits, seed)?,
        None => Genotype::from_initial_values(traits),
    })
}

/// Re-render `source` with its alterable values taken from `genotype`.
pub fn unparse_source(source: &str, genotype: &Genotype) -> Result<String, PipelineError> {
    let nodes = parse_source(source)?;
    Ok(seni_unparser::unparse(&nodes, genotype)?)
}

/// Breed `genotypes` up to the configured population size.
pub fn next_generation(
    genotypes: &[Genotype],
    traits: &[Trait],
    config: &PipelineConfig,
) -> Result<Vec<Genotype>, PipelineError> {
    Ok(seni_genetic::next_generation(
        genotypes,
        &config.genetic,
        traits,
    )?)
}
