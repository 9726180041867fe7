use std::cmp::Ordering;
use std::fmt::Debug;

use rand::RngCore;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies in genetic algorithms.
///
/// A selection strategy picks individuals from a population based on their
/// fitness. It works on *oriented* fitness, where higher is always better;
/// the controller negates raw fitness for minimization before calling it.
/// The result is a list of population indices, and repetition is allowed
/// unless the strategy documents otherwise.
///
/// # Examples
///
/// ```
/// use chromoga::selection::{SelectionStrategy, TournamentSelection};
/// use chromoga::rng::RandomNumberGenerator;
/// use chromoga::error::Result;
///
/// fn main() -> Result<()> {
///     let fitness = vec![0.5, 0.8, 0.3];
///     let mut rng = RandomNumberGenerator::from_seed(1);
///
///     let selection = TournamentSelection::new(3)?;
///     let selected = selection.select(&fitness, 2, &mut rng)?;
///
///     assert_eq!(selected, vec![1, 1]);
///     Ok(())
/// }
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects `num_to_select` individuals and returns their indices.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The fitness slice is empty
    /// - A fitness value is not finite
    /// - The strategy cannot work with the given values (e.g. negative
    ///   fitness under unscaled proportionate selection)
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>>;
}

/// Rejects empty populations and non-finite fitness values.
pub(crate) fn validate_fitness(fitness: &[f64]) -> Result<()> {
    if fitness.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    if let Some(value) = fitness.iter().find(|f| !f.is_finite()) {
        return Err(GeneticError::Selection(format!(
            "Non-finite fitness value encountered: {}",
            value
        )));
    }
    Ok(())
}

/// Indices ordered best-first. Equal fitness values are ordered uniformly at
/// random rather than by position.
pub(crate) fn rank_order(fitness: &[f64], rng: &mut RandomNumberGenerator) -> Vec<usize> {
    let mut keyed: Vec<(usize, u64)> = (0..fitness.len()).map(|i| (i, rng.next_u64())).collect();
    keyed.sort_by(|&(a, key_a), &(b, key_b)| {
        fitness[b]
            .partial_cmp(&fitness[a])
            .unwrap_or(Ordering::Equal)
            .then(key_a.cmp(&key_b))
    });
    keyed.into_iter().map(|(index, _)| index).collect()
}

/// Draws an index with probability proportional to `weights`.
///
/// Zero weights are never drawn. An all-zero weight vector falls back to a
/// uniform draw.
pub(crate) fn spin_wheel(weights: &[f64], total: f64, rng: &mut RandomNumberGenerator) -> usize {
    if total <= 0.0 {
        return rng.gen_index(weights.len());
    }

    let target = rng.gen_unit() * total;
    let mut cumulative = 0.0;
    for (index, &weight) in weights.iter().enumerate() {
        cumulative += weight;
        if target < cumulative {
            return index;
        }
    }

    // Rounding pushed the target past the last bucket.
    weights
        .iter()
        .rposition(|&weight| weight > 0.0)
        .unwrap_or(weights.len() - 1)
}
