use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::scaling::FitnessScaling;
use crate::selection::selection_strategy::{spin_wheel, validate_fitness, SelectionStrategy};

/// A selection strategy that selects individuals through roulette wheel selection.
///
/// Roulette wheel selection (also known as fitness proportionate selection) selects
/// individuals with probability proportional to their weight. The weights come
/// from the configured [`FitnessScaling`]:
///
/// - `Raw` uses fitness directly and fails on negative values.
/// - `Rank` and `Linear` accept any finite fitness.
///
/// An individual with zero weight is never selected while some other weight
/// is positive. When every weight is zero, selection is uniform.
///
/// # Examples
///
/// ```
/// use chromoga::selection::{FitnessScaling, RouletteWheelSelection, SelectionStrategy};
/// use chromoga::rng::RandomNumberGenerator;
/// use chromoga::error::Result;
///
/// fn main() -> Result<()> {
///     let fitness = vec![10.0, 0.0, 0.0, 0.0];
///     let mut rng = RandomNumberGenerator::from_seed(5);
///
///     let selection = RouletteWheelSelection::new(FitnessScaling::Raw);
///     let selected = selection.select(&fitness, 4, &mut rng)?;
///
///     assert_eq!(selected, vec![0, 0, 0, 0]);
///     Ok(())
/// }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouletteWheelSelection {
    scaling: FitnessScaling,
}

impl RouletteWheelSelection {
    /// Creates a new RouletteWheelSelection strategy with the given scaling.
    pub fn new(scaling: FitnessScaling) -> Self {
        Self { scaling }
    }

    pub fn scaling(&self) -> FitnessScaling {
        self.scaling
    }
}

impl SelectionStrategy for RouletteWheelSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        validate_fitness(fitness)?;

        let weights = self.scaling.apply(fitness)?;
        let total: f64 = weights.iter().sum();

        Ok((0..num_to_select)
            .map(|_| spin_wheel(&weights, total, rng))
            .collect())
    }
}
