//! # Breeding
//!
//! Breeding turns a pair of selected parents into two offspring. The
//! [`BreedStrategy`] trait is the seam for custom recombination schemes;
//! [`StandardBreeding`] applies crossover, then mutation, then inversion.
//!
//! [`breed_generation`] breeds a whole generation. Each parent pair gets its
//! own generator forked from the run's stream before any work starts, so the
//! offspring are the same whether the pairs are bred sequentially or on rayon
//! workers.

pub mod crossover;
pub mod inversion;
pub mod mutation;
pub mod ordinary;

pub use crossover::{Crossed, CrossoverKind};
pub use inversion::invert;
pub use mutation::MutationKind;
pub use ordinary::StandardBreeding;

use std::fmt::Debug;

use rayon::prelude::*;

use crate::error::{GeneticError, Result};
use crate::genome::{Allele, Chromosome, ChromosomeSchema};
use crate::rng::RandomNumberGenerator;

/// Operator settings for one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreedContext {
    pub crossover: CrossoverKind,
    pub mutation: MutationKind,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub inversion_rate: f64,
    /// Current multiplier of the Gaussian mutation spread.
    pub sigma_scale: f64,
}

/// A child together with what happened to it after crossover.
#[derive(Debug, Clone, PartialEq)]
pub struct Offspring<T> {
    pub chromosome: Chromosome<T>,
    /// Number of positions changed by mutation.
    pub mutations: usize,
    pub inverted: bool,
}

/// The two children of one parent pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Brood<T> {
    pub first: Offspring<T>,
    pub second: Offspring<T>,
    /// Whether crossover recombined the parents.
    pub crossed: bool,
}

/// Operator counters of one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BreedingStats {
    pub crossovers: usize,
    pub mutations: usize,
    pub inversions: usize,
}

/// # BreedStrategy
///
/// The `BreedStrategy` trait defines how two parents produce two offspring.
/// Implementations must return chromosomes that are valid for `schema`.
///
/// All randomness must come from `rng`; the caller hands every pair its own
/// generator.
pub trait BreedStrategy<T: Allele>: Debug + Send + Sync {
    /// Breeds two offspring from `first` and `second`.
    ///
    /// ## Errors
    ///
    /// This method can fail if an operator cannot be applied to the parents.
    fn breed(
        &self,
        schema: &ChromosomeSchema<T>,
        first: &Chromosome<T>,
        second: &Chromosome<T>,
        context: &BreedContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Brood<T>>;
}

/// Breeds `num_offspring` children from the parent `pairs`.
///
/// Pairs are bred on rayon workers when there are at least
/// `parallel_threshold` of them. When `num_offspring` is odd the second child
/// of the last pair is dropped.
///
/// ## Errors
///
/// - `Breeding` if there are too few pairs for `num_offspring` or a pair
///   refers to a missing parent.
/// - Any error of the strategy; the first failing pair wins.
#[allow(clippy::too_many_arguments)]
pub fn breed_generation<T, B>(
    strategy: &B,
    schema: &ChromosomeSchema<T>,
    parents: &[Chromosome<T>],
    pairs: &[(usize, usize)],
    num_offspring: usize,
    context: &BreedContext,
    parallel_threshold: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<(Vec<Chromosome<T>>, BreedingStats)>
where
    T: Allele,
    B: BreedStrategy<T> + ?Sized,
{
    if pairs.len() * 2 < num_offspring {
        return Err(GeneticError::Breeding(format!(
            "{} parent pairs cannot produce {} offspring",
            pairs.len(),
            num_offspring
        )));
    }
    if let Some(&(a, b)) = pairs.iter().find(|&&(a, b)| a >= parents.len() || b >= parents.len()) {
        return Err(GeneticError::Breeding(format!(
            "Parent pair ({}, {}) is outside a population of {}",
            a,
            b,
            parents.len()
        )));
    }

    let jobs: Vec<((usize, usize), RandomNumberGenerator)> =
        pairs.iter().map(|&pair| (pair, rng.fork())).collect();

    let breed_pair = |((a, b), mut pair_rng): ((usize, usize), RandomNumberGenerator)| {
        strategy.breed(schema, &parents[a], &parents[b], context, &mut pair_rng)
    };

    let broods: Vec<Brood<T>> = if jobs.len() >= parallel_threshold {
        jobs.into_par_iter().map(breed_pair).collect::<Result<_>>()?
    } else {
        jobs.into_iter().map(breed_pair).collect::<Result<_>>()?
    };

    let mut stats = BreedingStats::default();
    let mut children = Vec::with_capacity(num_offspring);
    for brood in broods {
        if children.len() >= num_offspring {
            break;
        }
        if brood.crossed {
            stats.crossovers += 1;
        }
        for offspring in [brood.first, brood.second] {
            if children.len() < num_offspring {
                stats.mutations += offspring.mutations;
                stats.inversions += usize::from(offspring.inverted);
                children.push(offspring.chromosome);
            }
        }
    }

    Ok((children, stats))
}
