use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{rank_order, validate_fitness, SelectionStrategy};

/// A selection strategy that keeps the fittest individuals.
///
/// Returns the indices of the `num_to_select` best individuals, best first,
/// without repetition. Asking for more individuals than exist returns the
/// whole population. Equal fitness values are ordered at random, so which of
/// several tied individuals makes the cut is a fair coin flip.
///
/// The controller uses it for elitism and for truncating an overpopulated
/// brood back to the target size.
///
/// # Examples
///
/// ```
/// use chromoga::selection::{ElitistSelection, SelectionStrategy};
/// use chromoga::rng::RandomNumberGenerator;
///
/// let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
/// let mut rng = RandomNumberGenerator::from_seed(1);
///
/// let selected = ElitistSelection.select(&fitness, 2, &mut rng).unwrap();
/// assert_eq!(selected, vec![3, 1]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElitistSelection;

impl SelectionStrategy for ElitistSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        validate_fitness(fitness)?;

        let mut ordered = rank_order(fitness, rng);
        ordered.truncate(num_to_select);
        Ok(ordered)
    }
}
