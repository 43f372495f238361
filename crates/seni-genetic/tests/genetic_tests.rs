//! Genetic tests: traits from real sources, seeded genotypes, breeding.

use seni_genetic::{build_traits, next_generation, GeneticConfig, GeneticError, GenotypeExt, Trait};
use seni_lexer::Lexer;
use seni_parser::parse;
use seni_types::ast::Node;
use seni_types::{Form, Genotype};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse_ok(source: &str) -> Vec<Node> {
    let lexed = Lexer::new(source).lex();
    assert!(lexed.is_ok(), "lex failed for {source:?}");
    parse(lexed.tokens).into_result().expect("parse failed")
}

fn traits_of(source: &str) -> Vec<Trait> {
    build_traits(&parse_ok(source)).expect("traits failed")
}

fn number(form: &Form) -> f64 {
    form.as_number()
        .unwrap_or_else(|| panic!("expected a number, got {form}"))
}

const SOURCE: &str = r#"
(define size [12 (int min: 10 max: 20)])
(define tint [0.5 (scalar min: 0.25 max: 0.75)])
(define shape [square (select from: '(square circle star))])
(define label ["fixed"])
(draw size tint shape label)"#;

// ─────────────────────────────────────────────────────────────────────
// Traits
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_traits_in_discovery_order() {
    let traits = traits_of(SOURCE);
    let syms: Vec<&str> = traits.iter().map(|t| t.gen_sym.as_str()).collect();
    assert_eq!(syms, ["__gensym_0", "__gensym_1", "__gensym_2", "__gensym_3"]);
    assert_eq!(traits[0].initial_value, Form::Number(12.0));
    assert_eq!(traits[1].initial_value, Form::Number(0.5));
    assert_eq!(traits[2].initial_value, Form::symbol("square"));
    assert_eq!(traits[3].initial_value, Form::Str("fixed".into()));
}

#[test]
fn test_trait_parameters_are_compiled() {
    let traits = traits_of("[3 (int min: 0 max: 5)]");
    assert_eq!(
        traits[0].parameters,
        vec![Form::List(vec![
            Form::symbol("int"),
            Form::Map(vec![
                ("min".into(), Form::Number(0.0)),
                ("max".into(), Form::Number(5.0)),
            ]),
        ])]
    );
    assert!(traits_of("[3]")[0].parameters.is_empty());
}

#[test]
fn test_parameters_are_not_searched_for_traits() {
    let traits = traits_of("(a [1 (int max: [5])] (b [2]))");
    assert_eq!(traits.len(), 2);
    assert_eq!(traits[0].initial_value, Form::Number(1.0));
    assert_eq!(traits[1].initial_value, Form::Number(2.0));
}

#[test]
fn test_no_alterables_no_traits() {
    assert!(traits_of("(+ 1 2)").is_empty());
}

#[test]
fn test_trait_json_round_trip() {
    let traits = traits_of(SOURCE);
    let json = serde_json::to_string(&traits).unwrap();
    let back: Vec<Trait> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, traits);
}

// ─────────────────────────────────────────────────────────────────────
// Genotypes
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_genotype_from_initial_values() {
    let genotype = Genotype::from_initial_values(&traits_of(SOURCE));
    assert_eq!(
        genotype.genes(),
        &[
            Form::Number(12.0),
            Form::Number(0.5),
            Form::symbol("square"),
            Form::Str("fixed".into()),
        ]
    );
}

#[test]
fn test_genotype_from_traits_respects_parameters() {
    let traits = traits_of(SOURCE);
    for seed in 0..50 {
        let genotype = Genotype::from_traits(&traits, seed).unwrap();
        assert_eq!(genotype.len(), 4);

        let size = number(&genotype.genes()[0]);
        assert!((10.0..20.0).contains(&size), "size {size}");
        assert_eq!(size.fract(), 0.0);

        let tint = number(&genotype.genes()[1]);
        assert!((0.25..0.75).contains(&tint), "tint {tint}");

        let shape = genotype.genes()[2].as_symbol().unwrap();
        assert!(["square", "circle", "star"].contains(&shape));

        assert_eq!(genotype.genes()[3], Form::Str("fixed".into()));
    }
}

#[test]
fn test_seeds_are_reproducible_and_distinct() {
    let traits = traits_of("[1 (scalar)] [2 (scalar)] [3 (scalar)]");
    let a = Genotype::from_traits(&traits, 5).unwrap();
    assert_eq!(Genotype::from_traits(&traits, 5).unwrap(), a);
    assert_ne!(Genotype::from_traits(&traits, 6).unwrap(), a);
}

#[test]
fn test_vector_and_col_bindings() {
    let traits = traits_of("[p (vector min: 0 max: 10)] [c (col alpha: 0.5)]");
    let genotype = Genotype::from_traits(&traits, 3).unwrap();

    let Form::List(point) = &genotype.genes()[0] else {
        panic!("expected a list");
    };
    assert_eq!(point[0], Form::symbol("list"));
    assert!(point[1..].iter().all(|v| (0.0..10.0).contains(&number(v))));

    let Form::List(colour) = &genotype.genes()[1] else {
        panic!("expected a list");
    };
    assert_eq!(colour[0], Form::symbol("col/rgb"));
    assert_eq!(colour[1].get("alpha"), Some(&Form::Number(0.5)));
}

#[test]
fn test_failing_parameters_name_the_trait() {
    let traits = traits_of("[1 (select from: 3)]");
    match Genotype::from_traits(&traits, 0) {
        Err(GeneticError::Eval { gen_sym, .. }) => assert_eq!(gen_sym, "__gensym_0"),
        other => panic!("expected an eval error, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Breeding
// ─────────────────────────────────────────────────────────────────────

fn population(traits: &[Trait], size: u64) -> Vec<Genotype> {
    (0..size)
        .map(|seed| Genotype::from_traits(traits, seed).unwrap())
        .collect()
}

#[test]
fn test_next_generation_fills_population() {
    let traits = traits_of(SOURCE);
    let parents = population(&traits, 4);
    let config = GeneticConfig {
        population_size: 12,
        mutation_rate: 0.2,
        seed: 11,
    };
    let next = next_generation(&parents, &config, &traits).unwrap();
    assert_eq!(next.len(), 12);
    assert_eq!(&next[..4], parents.as_slice());
    assert!(next.iter().all(|g| g.len() == traits.len()));
}

#[test]
fn test_crossover_without_mutation_reuses_parent_genes() {
    let traits = traits_of(SOURCE);
    let parents = population(&traits, 3);
    let config = GeneticConfig {
        population_size: 10,
        mutation_rate: 0.0,
        seed: 4,
    };
    let next = next_generation(&parents, &config, &traits).unwrap();
    for child in &next[3..] {
        for (i, gene) in child.genes().iter().enumerate() {
            assert!(
                parents.iter().any(|p| p.get(i) == Some(gene)),
                "gene {i} of {child:?} comes from no parent"
            );
        }
    }
}

#[test]
fn test_next_generation_errors() {
    let traits = traits_of(SOURCE);
    let config = GeneticConfig::default();
    assert!(matches!(
        next_generation(&[], &config, &traits),
        Err(GeneticError::EmptyPopulation)
    ));
    let short = Genotype::new(vec![Form::Number(1.0)]);
    assert!(matches!(
        next_generation(&[short], &config, &traits),
        Err(GeneticError::LengthMismatch { index: 0, found: 1, expected: 4 })
    ));
}

#[test]
fn test_genetic_determinism_100_iterations() {
    let traits = traits_of(SOURCE);
    let parents = population(&traits, 4);
    let config = GeneticConfig {
        population_size: 16,
        mutation_rate: 0.3,
        seed: 2024,
    };
    let first = next_generation(&parents, &config, &traits).unwrap();
    for i in 0..100 {
        assert_eq!(
            next_generation(&parents, &config, &traits).unwrap(),
            first,
            "iteration {i} diverged"
        );
    }
}
