//! End-to-end pipeline tests: each stage's failure is reported as that
//! stage, genotypes flow through compile and unparse, configuration is
//! honoured.

use seni_core::{
    build_traits, compile_source, create_genotype, digest_forms, evaluate_source,
    next_generation, parse_source, unparse_source, EvalError, Form, Genotype, PipelineConfig,
    PipelineError, Value,
};
use seni_types::ErrorCode;
use seni_unparser::UnparseError;

fn config() -> PipelineConfig {
    PipelineConfig::default()
}

fn value_of(source: &str) -> Value {
    match evaluate_source(source, None, &config()) {
        Ok(evaluation) => evaluation.value,
        Err(e) => panic!("{source:?} failed: {e}"),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Evaluation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_evaluate_arithmetic() {
    assert_eq!(value_of("(+ 2 (* 3 3))"), Value::Number(11.0));
}

#[test]
fn test_evaluate_program() {
    let src = "
        (define total 0)
        (fn (bump by: 1) (set! total (+ total by)))
        (loop (i from: 0 to: 4) (bump by: i))
        (bump)
        total";
    assert_eq!(value_of(src), Value::Number(7.0));
}

#[test]
fn test_evaluate_with_genotype() {
    let genotype = Genotype::new(vec![Form::Number(10.0)]);
    let evaluation = evaluate_source("(+ [2 (int)] 3)", Some(&genotype), &config()).unwrap();
    assert_eq!(evaluation.value, Value::Number(13.0));
}

#[test]
fn test_digest_tracks_compiled_forms() {
    let a = evaluate_source("(+ 1 2)", None, &config()).unwrap();
    let b = evaluate_source("(+ 1  2)", None, &config()).unwrap();
    let c = evaluate_source("(+ 2 1)", None, &config()).unwrap();
    assert_eq!(a.digest, b.digest);
    assert_ne!(a.digest, c.digest);
    assert_eq!(a.digest.len(), 64);
    assert_eq!(digest_forms(&a.forms).unwrap(), a.digest);
}

// ══════════════════════════════════════════════════════════════════════════════
// Stage failures
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_lex_failure() {
    match parse_source("(foo bar baz) | ") {
        Err(PipelineError::Lex(e)) => assert_eq!(e.code, ErrorCode::UNKNOWN_CHARACTER),
        other => panic!("expected a lex error, got {other:?}"),
    }
}

#[test]
fn test_parse_failure() {
    match parse_source("(foo (bar)") {
        Err(PipelineError::Parse(e)) => assert_eq!(e.code, ErrorCode::UNBALANCED_OPEN),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_strict_compile_aborts() {
    let strict = PipelineConfig {
        strict_compile: true,
        ..config()
    };
    match compile_source("(list arg1: 1 2)", None, &strict) {
        Err(PipelineError::Compile(e)) => assert_eq!(e.code, ErrorCode::NAMED_PARAMETER_ARITY),
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn test_lenient_compile_keeps_diagnostics() {
    let evaluation = evaluate_source("(list arg1: 1 2)", None, &config()).unwrap();
    assert!(evaluation.diagnostics.has_errors());
    assert_eq!(
        evaluation.value,
        Value::List(vec![Value::Map(vec![("arg1".into(), Value::Number(1.0))])])
    );
}

#[test]
fn test_eval_failure() {
    assert!(matches!(
        evaluate_source("(nope 1)", None, &config()),
        Err(PipelineError::Eval(EvalError::UnboundVariable(_)))
    ));
}

#[test]
fn test_gas_limit_from_json() {
    let limited = PipelineConfig::from_json(r#"{"eval": {"gas_limit": 10}}"#).unwrap();
    assert!(matches!(
        evaluate_source("(loop (i from: 0 to: 100) i)", None, &limited),
        Err(PipelineError::Eval(EvalError::GasExhausted(10)))
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Genetics
// ══════════════════════════════════════════════════════════════════════════════

const PIECE: &str = "(rect x: [100 (int min: 0 max: 200)] fill: [red (select from: '(red green))])";

#[test]
fn test_traits_genotype_unparse() {
    let traits = build_traits(PIECE).unwrap();
    assert_eq!(traits.len(), 2);

    let initial = create_genotype(&traits, None).unwrap();
    assert_eq!(unparse_source(PIECE, &initial).unwrap(), PIECE);

    let seeded = create_genotype(&traits, Some(8)).unwrap();
    let text = unparse_source(PIECE, &seeded).unwrap();
    let reparsed_traits = build_traits(&text).unwrap();
    assert_eq!(create_genotype(&reparsed_traits, None).unwrap(), seeded);
}

#[test]
fn test_next_generation_uses_configured_population() {
    let traits = build_traits(PIECE).unwrap();
    let parents: Vec<Genotype> = (0..3)
        .map(|seed| create_genotype(&traits, Some(seed)).unwrap())
        .collect();
    let mut config = config();
    config.genetic.population_size = 9;
    let population = next_generation(&parents, &traits, &config).unwrap();
    assert_eq!(population.len(), 9);
}

#[test]
fn test_genotype_transport() {
    let traits = build_traits(PIECE).unwrap();
    let genotype = create_genotype(&traits, Some(3)).unwrap();
    let json = genotype.to_json().unwrap();
    let back = Genotype::from_json(&json).unwrap();
    assert_eq!(back, genotype);
    assert_eq!(back.fingerprint().unwrap(), genotype.fingerprint().unwrap());
}

const STRUCTURED: &str = "(define c [red (col)] p [origin (vector)])";

#[test]
fn test_structured_genes_are_reported_not_mangled() {
    let traits = build_traits(STRUCTURED).unwrap();
    let initial = create_genotype(&traits, None).unwrap();
    assert_eq!(unparse_source(STRUCTURED, &initial).unwrap(), STRUCTURED);

    let seeded = create_genotype(&traits, Some(3)).unwrap();
    match unparse_source(STRUCTURED, &seeded) {
        Err(PipelineError::Unparse(UnparseError::UnrepresentableGene { gen_sym, gene })) => {
            assert_eq!(gen_sym, "__gensym_0");
            assert!(gene.starts_with("(col/rgb"), "{gene}");
        }
        other => panic!("expected an unrepresentable gene, got {other:?}"),
    }

    let vector_only = "(define p [origin (vector)])";
    let traits = build_traits(vector_only).unwrap();
    let seeded = create_genotype(&traits, Some(3)).unwrap();
    assert!(matches!(
        unparse_source(vector_only, &seeded),
        Err(PipelineError::Unparse(UnparseError::UnrepresentableGene { .. }))
    ));
}

#[test]
fn test_genotype_length_errors_surface() {
    let short = Genotype::new(vec![]);
    assert!(matches!(
        unparse_source(PIECE, &short),
        Err(PipelineError::Unparse(_))
    ));
}
