//! Breeding: crossover plus mutation.

use rand::Rng;
use seni_types::Genotype;
use tracing::{debug, trace};

use crate::config::GeneticConfig;
use crate::error::GeneticError;
use crate::genotype::GeneSampler;
use crate::traits::Trait;

/// Attempts at drawing a second parent different from the first.
const PARENT_RETRIES: usize = 10;

/// Grow `genotypes` to `config.population_size`.
///
/// The existing genotypes are kept as the first members. Each new member is
/// a single-point crossover of two parents (distinct where the population
/// allows), after which every gene is re-sampled from its trait with
/// probability `config.mutation_rate`.
pub fn next_generation(
    genotypes: &[Genotype],
    config: &GeneticConfig,
    traits: &[Trait],
) -> Result<Vec<Genotype>, GeneticError> {
    if genotypes.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    for (index, genotype) in genotypes.iter().enumerate() {
        if genotype.len() != traits.len() {
            return Err(GeneticError::LengthMismatch {
                index,
                found: genotype.len(),
                expected: traits.len(),
            });
        }
    }

    let mut sampler = GeneSampler::new(config.seed);
    let rng = sampler.rng().clone();
    let mut population = genotypes.to_vec();

    while population.len() < config.population_size {
        let (a, b, crossover) = {
            let mut rng = rng.borrow_mut();
            let a = rng.gen_range(0..genotypes.len());
            let mut b = rng.gen_range(0..genotypes.len());
            for _ in 0..PARENT_RETRIES {
                if b != a {
                    break;
                }
                b = rng.gen_range(0..genotypes.len());
            }
            (a, b, rng.gen_range(0..=traits.len()))
        };
        trace!(a, b, crossover, "crossover");

        let mut genes: Vec<_> = genotypes[a].genes()[..crossover].to_vec();
        genes.extend_from_slice(&genotypes[b].genes()[crossover..]);

        for (gene, t) in genes.iter_mut().zip(traits) {
            let roll = rng.borrow_mut().gen::<f64>();
            if roll < config.mutation_rate {
                *gene = sampler.sample(t)?;
            }
        }
        population.push(Genotype::new(genes));
    }

    debug!(
        parents = genotypes.len(),
        population = population.len(),
        seed = config.seed,
        "next generation"
    );
    Ok(population)
}
