use std::collections::HashSet;

use crate::error::{GeneticError, OptionExt, Result};
use crate::genome::alphabet::{Allele, Alphabet};
use crate::genome::chromosome::Chromosome;
use crate::rng::RandomNumberGenerator;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
enum Positions<T> {
    Uniform(Alphabet<T>),
    PerPosition(Vec<Alphabet<T>>),
}

/// The shape shared by every chromosome of a run: its length and the
/// alphabet of each position.
///
/// ```rust
/// use chromoga::genome::{Alphabet, ChromosomeSchema};
/// use chromoga::rng::RandomNumberGenerator;
///
/// let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 8).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(3);
///
/// let chromosome = schema.random_chromosome(&mut rng).unwrap();
/// assert_eq!(chromosome.len(), 8);
/// assert!(schema.validate(&chromosome).is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeSchema<T> {
    positions: Positions<T>,
    length: usize,
}

impl<T: Allele> ChromosomeSchema<T> {
    /// All `length` positions draw from `alphabet`.
    ///
    /// # Errors
    ///
    /// - `Configuration` if `length` is zero or the alphabet is invalid.
    /// - `AlphabetExhaustion` if `alphabet` is a permutation alphabet with
    ///   fewer than `length` values.
    pub fn uniform(alphabet: Alphabet<T>, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(GeneticError::Configuration(
                "Chromosome length must be at least 1".to_string(),
            ));
        }
        alphabet.validate()?;

        if let Alphabet::Permutation(values) = &alphabet {
            if values.len() < length {
                return Err(GeneticError::AlphabetExhaustion {
                    alphabet_size: values.len(),
                    length,
                });
            }
        }

        Ok(Self {
            positions: Positions::Uniform(alphabet),
            length,
        })
    }

    /// Each position has its own alphabet. Permutation alphabets are not
    /// allowed here because uniqueness spans the whole chromosome.
    pub fn per_position(alphabets: Vec<Alphabet<T>>) -> Result<Self> {
        if alphabets.is_empty() {
            return Err(GeneticError::Configuration(
                "Chromosome length must be at least 1".to_string(),
            ));
        }
        for (position, alphabet) in alphabets.iter().enumerate() {
            alphabet.validate()?;
            if alphabet.is_permutation() {
                return Err(GeneticError::Configuration(format!(
                    "Position {} uses a permutation alphabet; permutations require a uniform schema",
                    position
                )));
            }
        }

        let length = alphabets.len();
        Ok(Self {
            positions: Positions::PerPosition(alphabets),
            length,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the alphabet of `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.length()`.
    pub fn alphabet_at(&self, position: usize) -> &Alphabet<T> {
        assert!(position < self.length, "position {} out of bounds", position);
        match &self.positions {
            Positions::Uniform(alphabet) => alphabet,
            Positions::PerPosition(alphabets) => &alphabets[position],
        }
    }

    /// Iterates over the alphabet of every position in order.
    pub fn alphabets(&self) -> impl Iterator<Item = &Alphabet<T>> + '_ {
        (0..self.length).map(move |position| self.alphabet_at(position))
    }

    pub fn is_permutation(&self) -> bool {
        matches!(&self.positions, Positions::Uniform(alphabet) if alphabet.is_permutation())
    }

    /// `true` when every position shares one alphabet, so genes may move
    /// between positions (inversion).
    pub fn is_homogeneous(&self) -> bool {
        match &self.positions {
            Positions::Uniform(_) => true,
            Positions::PerPosition(alphabets) => alphabets.windows(2).all(|w| w[0] == w[1]),
        }
    }

    /// `true` when every position has a numeric range alphabet.
    pub fn is_numeric(&self) -> bool {
        self.alphabets()
            .all(|alphabet| matches!(alphabet, Alphabet::Range { .. }))
    }

    /// Samples a random chromosome. Permutation schemas yield distinct values.
    pub fn random_chromosome(&self, rng: &mut RandomNumberGenerator) -> Result<Chromosome<T>> {
        match &self.positions {
            Positions::Uniform(alphabet) if alphabet.is_permutation() => {
                let genes = alphabet
                    .sample_distinct(self.length, rng)
                    .ok_or_else_genetic(|| GeneticError::AlphabetExhaustion {
                        alphabet_size: alphabet.size().unwrap_or(0),
                        length: self.length,
                    })?;
                Ok(Chromosome::from_genes(genes))
            }
            _ => Ok(Chromosome::from_genes(
                self.alphabets().map(|alphabet| alphabet.sample(rng)).collect(),
            )),
        }
    }

    /// Builds a chromosome from caller-supplied genes, checking them first.
    pub fn chromosome(&self, genes: Vec<T>) -> Result<Chromosome<T>> {
        let chromosome = Chromosome::from_genes(genes);
        self.validate(&chromosome)?;
        Ok(chromosome)
    }

    /// Checks length, alphabet membership, and permutation uniqueness.
    pub fn validate(&self, chromosome: &Chromosome<T>) -> Result<()> {
        if chromosome.len() != self.length {
            return Err(GeneticError::InvalidChromosome(format!(
                "Expected {} genes, found {}",
                self.length,
                chromosome.len()
            )));
        }

        for (position, (gene, alphabet)) in
            chromosome.genes().iter().zip(self.alphabets()).enumerate()
        {
            if !alphabet.contains(gene) {
                return Err(GeneticError::InvalidChromosome(format!(
                    "Gene {:?} at position {} is outside its alphabet",
                    gene, position
                )));
            }
        }

        if self.is_permutation() {
            let mut seen = HashSet::with_capacity(self.length);
            if let Some(duplicate) = chromosome.genes().iter().find(|g| !seen.insert(g.key())) {
                return Err(GeneticError::InvalidChromosome(format!(
                    "Gene {:?} appears more than once in a permutation",
                    duplicate
                )));
            }
        }

        Ok(())
    }
}
