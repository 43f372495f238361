//! Breeding parameters.

use serde::{Deserialize, Serialize};

/// How [`next_generation`](crate::next_generation) fills a population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Size of the population after breeding.
    pub population_size: usize,
    /// Chance, per gene, of re-sampling a child's gene from its trait.
    pub mutation_rate: f64,
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 24,
            mutation_rate: 0.1,
            seed: 42,
        }
    }
}
