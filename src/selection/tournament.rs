use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{validate_fitness, SelectionStrategy};

/// A selection strategy that selects individuals through tournament selection.
///
/// Each draw samples `tournament_size` distinct individuals uniformly at
/// random and keeps the fittest of them. Ties inside a tournament are broken
/// uniformly at random. Individuals may win more than one tournament.
///
/// Tournament selection provides a balance between exploration and exploitation:
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
///
/// A tournament of size 1 is uniform random selection; a tournament as large
/// as the population always returns the fittest individual.
///
/// # Examples
///
/// ```
/// use chromoga::selection::{SelectionStrategy, TournamentSelection};
/// use chromoga::rng::RandomNumberGenerator;
///
/// let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
/// let mut rng = RandomNumberGenerator::from_seed(42);
///
/// let selection = TournamentSelection::default();
/// let selected = selection.select(&fitness, 3, &mut rng).unwrap();
///
/// assert_eq!(selected.len(), 3);
/// assert!(selected.iter().all(|&i| i != 4));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy with the specified tournament size.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs a single tournament and returns the index of the winner.
    fn run_tournament(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> usize {
        let participants = rng.distinct_indices(fitness.len(), self.tournament_size);

        let best_fitness = participants
            .iter()
            .map(|&i| fitness[i])
            .fold(f64::NEG_INFINITY, f64::max);
        let leaders: Vec<usize> = participants
            .into_iter()
            .filter(|&i| fitness[i] == best_fitness)
            .collect();

        if leaders.len() == 1 {
            leaders[0]
        } else {
            leaders[rng.gen_index(leaders.len())]
        }
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { tournament_size: 2 }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        validate_fitness(fitness)?;

        if self.tournament_size > fitness.len() {
            return Err(GeneticError::Selection(format!(
                "Tournament size ({}) exceeds population size ({})",
                self.tournament_size,
                fitness.len()
            )));
        }

        Ok((0..num_to_select)
            .map(|_| self.run_tournament(fitness, rng))
            .collect())
    }
}
