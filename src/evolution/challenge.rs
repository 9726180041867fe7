//! # Challenge
//!
//! A `Challenge` is the objective function of a run: it maps a chromosome to
//! a scalar fitness. It must be a pure function of the genes, since equal
//! chromosomes share one cached score.
//!
//! Plain closures over the gene slice are challenges:
//!
//! ```rust
//! use chromoga::evolution::Challenge;
//! use chromoga::genome::{Alphabet, ChromosomeSchema};
//!
//! let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 3).unwrap();
//! let ones = |genes: &[u8]| genes.iter().map(|&g| g as f64).sum::<f64>();
//!
//! let chromosome = schema.chromosome(vec![1, 0, 1]).unwrap();
//! assert_eq!(ones.score(&chromosome).unwrap(), 2.0);
//! ```
//!
//! Objectives that can fail are wrapped in [`FallibleChallenge`].

use std::error::Error as StdError;
use std::fmt;

use crate::error::{GeneticError, Result};
use crate::genome::{Allele, Chromosome};

pub trait Challenge<T: Allele>: Send + Sync {
    fn score(&self, chromosome: &Chromosome<T>) -> Result<f64>;
}

impl<T, F> Challenge<T> for F
where
    T: Allele,
    F: Fn(&[T]) -> f64 + Send + Sync,
{
    fn score(&self, chromosome: &Chromosome<T>) -> Result<f64> {
        Ok(self(chromosome.genes()))
    }
}

/// Adapts a closure returning `Result<f64, E>` into a [`Challenge`]. Errors
/// become evaluation errors carrying the closure's message.
///
/// ```rust
/// use chromoga::evolution::{Challenge, FallibleChallenge};
/// use chromoga::genome::{Alphabet, ChromosomeSchema};
///
/// let schema = ChromosomeSchema::uniform(Alphabet::range(0i32, 9).unwrap(), 2).unwrap();
/// let ratio = FallibleChallenge::new(|genes: &[i32]| {
///     "1".parse::<f64>().map(|one| one / (1 + genes[0] + genes[1]) as f64)
/// });
///
/// let chromosome = schema.chromosome(vec![1, 2]).unwrap();
/// assert_eq!(ratio.score(&chromosome).unwrap(), 0.25);
/// ```
#[derive(Clone)]
pub struct FallibleChallenge<F> {
    objective: F,
}

impl<F> FallibleChallenge<F> {
    pub fn new(objective: F) -> Self {
        Self { objective }
    }
}

impl<F> fmt::Debug for FallibleChallenge<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallibleChallenge").finish_non_exhaustive()
    }
}

impl<T, F, E> Challenge<T> for FallibleChallenge<F>
where
    T: Allele,
    F: Fn(&[T]) -> std::result::Result<f64, E> + Send + Sync,
    E: StdError + Send + Sync + 'static,
{
    fn score(&self, chromosome: &Chromosome<T>) -> Result<f64> {
        (self.objective)(chromosome.genes()).map_err(|e| GeneticError::evaluation(e.to_string()))
    }
}
