use std::fmt;
use std::ops::Index;

use crate::caching::CacheKey;
use crate::genome::alphabet::Allele;

/// An ordered, fixed-length sequence of genes.
///
/// Chromosomes are values: cloning copies every gene, and the operators never
/// edit a chromosome in place but return a new one. Fitness is not stored on
/// the chromosome; it is cached by value in the evaluator.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome<T> {
    genes: Vec<T>,
}

impl<T: Allele> Chromosome<T> {
    /// Wraps genes without checking them against a schema. Use
    /// [`ChromosomeSchema::chromosome`](crate::genome::ChromosomeSchema::chromosome)
    /// for caller-supplied genes.
    pub(crate) fn from_genes(genes: Vec<T>) -> Self {
        Self { genes }
    }

    pub fn genes(&self) -> &[T] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.genes.get(position)
    }

    pub fn into_genes(self) -> Vec<T> {
        self.genes
    }

    /// Returns a new chromosome with `genes[position]` replaced by `value`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not less than the chromosome length.
    pub fn with_gene(&self, position: usize, value: T) -> Self {
        let mut genes = self.genes.clone();
        genes[position] = value;
        Self { genes }
    }
}

impl<T> Index<usize> for Chromosome<T> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        &self.genes[position]
    }
}

impl<T: Allele> CacheKey for Chromosome<T> {
    type Key = Vec<T::Key>;

    fn cache_key(&self) -> Self::Key {
        self.genes.iter().map(Allele::key).collect()
    }
}

impl<T: fmt::Display> fmt::Display for Chromosome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", gene)?;
        }
        write!(f, "]")
    }
}
