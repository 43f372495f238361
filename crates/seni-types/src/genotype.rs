//! Genotypes: one concrete value per alterable slot, in traversal order.

use crate::Form;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Errors moving a genotype across a transport boundary.
#[derive(Debug, thiserror::Error)]
pub enum GenotypeError {
    #[error("invalid genotype JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An ordered sequence of genes.
///
/// The sequence itself is immutable once built; consumers read it through a
/// [`GeneCursor`] so that each alterable node takes exactly the next value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genotype {
    genes: Vec<Form>,
}

impl Genotype {
    pub fn new(genes: Vec<Form>) -> Self {
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[Form] {
        &self.genes
    }

    pub fn get(&self, index: usize) -> Option<&Form> {
        self.genes.get(index)
    }

    pub fn into_genes(self) -> Vec<Form> {
        self.genes
    }

    /// A cursor positioned at the first gene.
    pub fn cursor(&self) -> GeneCursor<'_> {
        GeneCursor {
            genes: &self.genes,
            pos: 0,
        }
    }

    /// Serialize to a JSON array for transport.
    pub fn to_json(&self) -> Result<String, GenotypeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a genotype produced by [`Genotype::to_json`].
    pub fn from_json(json: &str) -> Result<Self, GenotypeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Hex SHA-256 of the JSON encoding. Equal genotypes share a fingerprint.
    pub fn fingerprint(&self) -> Result<String, GenotypeError> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl From<Vec<Form>> for Genotype {
    fn from(genes: Vec<Form>) -> Self {
        Self::new(genes)
    }
}

impl FromIterator<Form> for Genotype {
    fn from_iter<I: IntoIterator<Item = Form>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Read position into a genotype.
#[derive(Debug, Clone)]
pub struct GeneCursor<'a> {
    genes: &'a [Form],
    pos: usize,
}

impl<'a> GeneCursor<'a> {
    /// Take the next gene, or `None` once every gene has been used.
    pub fn next_gene(&mut self) -> Option<&'a Form> {
        let gene = self.genes.get(self.pos)?;
        self.pos += 1;
        Some(gene)
    }

    /// Number of genes already taken.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of genes not yet taken.
    pub fn remaining(&self) -> usize {
        self.genes.len() - self.pos
    }
}
