//! Building genotypes from traits.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use seni_eval::{EvalConfig, Interpreter};
use seni_types::{Form, Genotype};
use tracing::debug;

use crate::bindings::{bracket_registry, SharedRng};
use crate::error::GeneticError;
use crate::traits::Trait;

/// Genotype constructors driven by a trait list.
pub trait GenotypeExt: Sized {
    /// Every gene is the value written in the source.
    fn from_initial_values(traits: &[Trait]) -> Self;

    /// Every gene is sampled from its trait's parameters with a seeded
    /// generator. Traits without parameters keep their initial value.
    fn from_traits(traits: &[Trait], seed: u64) -> Result<Self, GeneticError>;
}

impl GenotypeExt for Genotype {
    fn from_initial_values(traits: &[Trait]) -> Self {
        traits.iter().map(|t| t.initial_value.clone()).collect()
    }

    fn from_traits(traits: &[Trait], seed: u64) -> Result<Self, GeneticError> {
        let mut sampler = GeneSampler::new(seed);
        let genes = traits
            .iter()
            .map(|t| sampler.sample(t))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(genes = genes.len(), seed, "genotype from traits");
        Ok(Genotype::new(genes))
    }
}

/// Evaluates trait parameters in an interpreter extended with the bracket
/// bindings. The generator is shared with the caller through [`GeneSampler::rng`].
pub(crate) struct GeneSampler {
    interpreter: Interpreter,
    rng: SharedRng,
}

impl GeneSampler {
    pub(crate) fn new(seed: u64) -> Self {
        let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(seed)));
        let registry = Rc::new(bracket_registry(&rng));
        Self {
            interpreter: Interpreter::with_registry(EvalConfig::default(), registry),
            rng,
        }
    }

    pub(crate) fn rng(&self) -> &SharedRng {
        &self.rng
    }

    /// A fresh gene for `t`. The last parameter form gives the value.
    ///
    /// Each sample runs in its own scope with its own gas budget.
    pub(crate) fn sample(&mut self, t: &Trait) -> Result<Form, GeneticError> {
        if t.parameters.is_empty() {
            return Ok(t.initial_value.clone());
        }
        let value = self
            .interpreter
            .evaluate_isolated(&t.parameters)
            .map_err(|source| GeneticError::Eval {
                gen_sym: t.gen_sym.clone(),
                source,
            })?;
        match value.to_form() {
            Some(Form::Null) | None => Err(GeneticError::NoGene(t.gen_sym.clone())),
            Some(gene) => Ok(gene),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_trait(gen_sym: &str) -> Trait {
        Trait {
            gen_sym: gen_sym.into(),
            initial_value: Form::Number(5.0),
            parameters: vec![Form::List(vec![
                Form::symbol("int"),
                Form::Map(vec![
                    ("min".into(), Form::Number(0.0)),
                    ("max".into(), Form::Number(10.0)),
                ]),
            ])],
        }
    }

    #[test]
    fn test_initial_values() {
        let genotype = Genotype::from_initial_values(&[int_trait("a"), int_trait("b")]);
        assert_eq!(genotype.genes(), &[Form::Number(5.0), Form::Number(5.0)]);
    }

    #[test]
    fn test_same_seed_same_genes() {
        let traits: Vec<Trait> = (0..8).map(|i| int_trait(&format!("g{i}"))).collect();
        let a = Genotype::from_traits(&traits, 99).unwrap();
        let b = Genotype::from_traits(&traits, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parameterless_trait_keeps_initial_value() {
        let t = Trait {
            gen_sym: "s".into(),
            initial_value: Form::Str("keep".into()),
            parameters: vec![],
        };
        assert_eq!(
            Genotype::from_traits(&[t], 1).unwrap().genes(),
            &[Form::Str("keep".into())]
        );
    }

    #[test]
    fn test_samples_do_not_share_bindings() {
        let leaky = Trait {
            gen_sym: "a".into(),
            initial_value: Form::Number(0.0),
            parameters: vec![
                Form::List(vec![
                    Form::symbol("define"),
                    Form::symbol("leak"),
                    Form::Number(3.0),
                ]),
                Form::symbol("leak"),
            ],
        };
        let reader = Trait {
            gen_sym: "b".into(),
            initial_value: Form::Number(0.0),
            parameters: vec![Form::symbol("leak")],
        };
        let mut sampler = GeneSampler::new(1);
        assert_eq!(sampler.sample(&leaky).unwrap(), Form::Number(3.0));
        assert!(matches!(
            sampler.sample(&reader),
            Err(GeneticError::Eval { gen_sym, .. }) if gen_sym == "b"
        ));
    }

    #[test]
    fn test_function_valued_parameters_are_rejected() {
        let t = Trait {
            gen_sym: "f".into(),
            initial_value: Form::Number(0.0),
            parameters: vec![Form::symbol("int")],
        };
        assert!(matches!(
            Genotype::from_traits(&[t], 1),
            Err(GeneticError::NoGene(_))
        ));
    }
}
