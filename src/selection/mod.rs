//! # Selection
//!
//! Selection strategies pick parents from a population, biased toward higher
//! fitness. Every strategy works on oriented fitness (higher is better) and
//! returns population indices.
//!
//! [`SelectionMethod`] is the serializable choice stored in the evolution
//! options; it dispatches to the concrete strategies.

pub mod elitist;
pub mod rank;
pub mod roulette;
pub mod scaling;
pub mod selection_strategy;
pub mod tournament;

pub use elitist::ElitistSelection;
pub use rank::RankBasedSelection;
pub use roulette::RouletteWheelSelection;
pub use scaling::FitnessScaling;
pub use selection_strategy::SelectionStrategy;
pub use tournament::TournamentSelection;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// The parent selection method of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionMethod {
    /// Fitness-proportionate (roulette wheel) selection.
    Proportionate { scaling: FitnessScaling },
    Tournament { size: usize },
    Rank { pressure: f64 },
}

/// Proportionate selection with linear scaling, which accepts negative fitness.
impl Default for SelectionMethod {
    fn default() -> Self {
        SelectionMethod::Proportionate {
            scaling: FitnessScaling::linear(),
        }
    }
}

impl SelectionMethod {
    /// Checks the method's parameters against the population size.
    pub fn validate(&self, population_size: usize) -> Result<()> {
        match self {
            SelectionMethod::Proportionate { scaling } => scaling.validate(),
            SelectionMethod::Tournament { size } => {
                TournamentSelection::new(*size)?;
                if *size > population_size {
                    return Err(GeneticError::Configuration(format!(
                        "Tournament size ({}) exceeds population size ({})",
                        size, population_size
                    )));
                }
                Ok(())
            }
            SelectionMethod::Rank { pressure } => RankBasedSelection::new(*pressure).map(|_| ()),
        }
    }
}

impl SelectionStrategy for SelectionMethod {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        match self {
            SelectionMethod::Proportionate { scaling } => {
                RouletteWheelSelection::new(*scaling).select(fitness, num_to_select, rng)
            }
            SelectionMethod::Tournament { size } => {
                TournamentSelection::new(*size)?.select(fitness, num_to_select, rng)
            }
            SelectionMethod::Rank { pressure } => {
                RankBasedSelection::new(*pressure)?.select(fitness, num_to_select, rng)
            }
        }
    }
}
