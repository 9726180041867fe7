use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{
    rank_order, spin_wheel, validate_fitness, SelectionStrategy,
};

/// A selection strategy based on linear ranking.
///
/// Individuals are sorted by fitness and the selection probability depends
/// only on the position in that order, never on the magnitude of the fitness
/// values. With `n` individuals and pressure `sp`, the individual of rank `r`
/// (worst = 0, best = n - 1) is selected with probability
///
/// ```text
/// p(r) = (2 - sp + 2 (sp - 1) r / (n - 1)) / n
/// ```
///
/// Equal fitness values are ordered at random on every call, so tied
/// individuals have the same expected share.
///
/// # Examples
///
/// ```
/// use chromoga::selection::{RankBasedSelection, SelectionStrategy};
/// use chromoga::rng::RandomNumberGenerator;
///
/// let fitness = vec![-10.0, -5.0, 20.0];
/// let mut rng = RandomNumberGenerator::from_seed(9);
///
/// let selection = RankBasedSelection::new(2.0).unwrap();
/// let selected = selection.select(&fitness, 50, &mut rng).unwrap();
///
/// // Maximum pressure gives the worst individual no share at all.
/// assert!(!selected.contains(&0));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RankBasedSelection {
    /// Higher values increase selection pressure.
    selection_pressure: f64,
}

impl RankBasedSelection {
    /// Creates a new RankBasedSelection strategy.
    ///
    /// - At 1.0, all individuals have equal selection probability
    /// - At 2.0, selection pressure is at its maximum
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `selection_pressure`
    /// is not in the range [1.0, 2.0].
    pub fn new(selection_pressure: f64) -> Result<Self> {
        if !(1.0..=2.0).contains(&selection_pressure) {
            return Err(GeneticError::Configuration(
                "Selection pressure must be in the range [1.0, 2.0]".to_string(),
            ));
        }

        Ok(Self { selection_pressure })
    }

    pub fn selection_pressure(&self) -> f64 {
        self.selection_pressure
    }

    /// Selection weights indexed like `fitness`.
    fn calculate_probabilities(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Vec<f64> {
        let population_size = fitness.len();
        if population_size == 1 {
            return vec![1.0];
        }

        let n = population_size as f64;
        let sp = self.selection_pressure;
        let mut probs = vec![0.0; population_size];

        for (position, index) in rank_order(fitness, rng).into_iter().enumerate() {
            let rank = (population_size - 1 - position) as f64;
            probs[index] = (2.0 - sp + 2.0 * (sp - 1.0) * rank / (n - 1.0)) / n;
        }

        probs
    }
}

impl Default for RankBasedSelection {
    fn default() -> Self {
        Self {
            selection_pressure: 1.5,
        }
    }
}

impl SelectionStrategy for RankBasedSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        validate_fitness(fitness)?;

        let probs = self.calculate_probabilities(fitness, rng);
        let total: f64 = probs.iter().sum();

        Ok((0..num_to_select)
            .map(|_| spin_wheel(&probs, total, rng))
            .collect())
    }
}
