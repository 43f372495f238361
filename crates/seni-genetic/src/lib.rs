//! Seni genetics.
//!
//! Alterable nodes in a parse become [`Trait`]s. A trait list yields
//! genotypes, either from the values written in the source or by sampling
//! each trait's parameter annotations with a seeded generator, and a
//! population of genotypes breeds the next one with [`next_generation`].
//!
//! ```text
//! (+ [2 (int min: 0 max: 9)] [0.5 (scalar)])
//!     traits:    __gensym_0 = 2, __gensym_1 = 0.5
//!     genotype:  (7 0.318)     for some seed
//! ```

mod bindings;
mod config;
mod error;
mod generation;
mod genotype;
mod traits;

pub use bindings::{bracket_registry, SharedRng};
pub use config::GeneticConfig;
pub use error::GeneticError;
pub use generation::next_generation;
pub use genotype::GenotypeExt;
pub use traits::{build_traits, Trait};
