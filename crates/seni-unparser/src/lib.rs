//! Seni unparser: the inverse of parse + harvest.
//!
//! ```text
//! source:   (+ [2 (int)] 3.0)
//! genotype: (7)
//! output:   (+ [7 (int)] 3.0)
//! ```
//!
//! The output re-parses to the same tree, with each alterable value
//! replaced by its gene.

mod unparser;

pub use unparser::{format_gene, format_number, unparse, UnparseError};
